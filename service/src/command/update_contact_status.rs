//! [`Command`] for updating the status of a [`Contact`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, Contact},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the [`contact::Status`] of a [`Contact`].
///
/// The only mutation a [`Contact`] admits after its creation.
#[derive(Clone, Copy, Debug)]
pub struct UpdateContactStatus {
    /// ID of the [`Contact`] to update.
    pub contact_id: contact::Id,

    /// New [`contact::Status`] of the [`Contact`].
    pub status: contact::Status,
}

impl<Db> Command<UpdateContactStatus> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contact>, contact::Id>>,
            Ok = Option<Contact>,
            Err = Traced<database::Error>,
        > + Database<Update<Contact>, Err = Traced<database::Error>>,
{
    type Ok = Contact;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateContactStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateContactStatus { contact_id, status } = cmd;

        let mut contact = self
            .database()
            .execute(Select(By::<Option<Contact>, _>::new(contact_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContactNotExists(contact_id))
            .map_err(tracerr::wrap!())?;

        contact.status = status;
        self.database()
            .execute(Update(contact.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contact)
    }
}

/// Error of [`UpdateContactStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contact`] with the provided ID does not exist.
    #[display("`Contact(id: {_0})` does not exist")]
    ContactNotExists(#[error(not(source))] contact::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};

    use crate::{
        domain::{contact, Contact},
        infra::{database::mem::Mem, Database as _},
        Service,
    };

    use super::{Command as _, UpdateContactStatus};

    #[tokio::test]
    async fn updates_status_only() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let contact = Contact {
            id: contact::Id::new(),
            name: "Ravi Kumar".parse().unwrap(),
            email: "ravi@example.com".parse().unwrap(),
            phone: None,
            message: "Is this still available?".parse().unwrap(),
            property_id: None,
            status: contact::Status::New,
            created_at: DateTime::now().coerce(),
        };
        db.execute(Insert(contact.clone())).await.unwrap();

        let updated = svc
            .execute(UpdateContactStatus {
                contact_id: contact.id,
                status: contact::Status::Resolved,
            })
            .await
            .unwrap();

        assert_eq!(updated.status, contact::Status::Resolved);
        let stored = db.contact(contact.id).unwrap();
        assert_eq!(stored.status, contact::Status::Resolved);
        assert_eq!(stored.message, contact.message);
    }

    #[tokio::test]
    async fn errors_on_missing_contact() {
        let svc = Service::stub(Mem::default());

        let result = svc
            .execute(UpdateContactStatus {
                contact_id: contact::Id::new(),
                status: contact::Status::InProgress,
            })
            .await;

        assert!(result.is_err());
    }
}
