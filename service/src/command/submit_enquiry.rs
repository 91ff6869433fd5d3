//! [`Command`] for submitting an enquiry.

use common::{
    operations::{
        By, Commit, Delete, Insert, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contact, lead, property, Contact, Lead, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for submitting an enquiry.
///
/// Persists the durable [`Contact`] audit record together with a
/// [`lead::Draft`] outbox record in one transaction, then attempts an
/// immediate best-effort delivery of the [`Lead`]. A failed delivery is
/// only logged: the enquiry never fails because of the [`Lead`] store, and
/// the queued [`lead::Draft`] is drained later by the background task.
///
/// The [`Lead`] carries a point-in-time copy of the referenced
/// [`Property`]'s assigned agents, untouched by any later reassignment.
#[derive(Clone, Debug)]
pub struct SubmitEnquiry {
    /// [`contact::Name`] of the enquirer.
    pub name: contact::Name,

    /// [`contact::Email`] of the enquirer.
    pub email: contact::Email,

    /// [`contact::Phone`] of the enquirer.
    pub phone: Option<contact::Phone>,

    /// [`contact::Message`] of the enquiry.
    pub message: contact::Message,

    /// ID of the [`Property`] the enquiry is about, if any.
    pub property_id: Option<property::Id>,
}

impl<Db> Command<SubmitEnquiry> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Lead>, Err = Traced<database::Error>>
        + Database<
            Delete<By<lead::Draft, lead::Id>>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Contact>, Err = Traced<database::Error>>
        + Database<Insert<lead::Draft>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contact;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitEnquiry,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitEnquiry {
            name,
            email,
            phone,
            message,
            property_id,
        } = cmd;

        let (assigned_agents, source) = if let Some(id) = property_id {
            let property = self
                .database()
                .execute(Select(By::<Option<Property>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::PropertyNotExists(id))
                .map_err(tracerr::wrap!())?;

            (property.assigned_agents, lead::Source::PropertyContactForm)
        } else {
            (vec![], lead::Source::GeneralContactForm)
        };

        let now = DateTime::now();
        let contact = Contact {
            id: contact::Id::new(),
            name: name.clone(),
            email: email.clone(),
            phone: phone.clone(),
            message: message.clone(),
            property_id,
            status: contact::Status::New,
            created_at: now.coerce(),
        };
        let lead = Lead {
            id: lead::Id::new(),
            name,
            email,
            phone,
            message,
            property_id,
            assigned_agents,
            status: lead::Status::New,
            priority: lead::Priority::Low,
            source,
            notes: vec![],
            created_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(contact.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(lead::Draft::new(lead.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Immediate best-effort delivery. The committed draft is the
        // fallback, so any failure from here on is non-fatal.
        match self.database().execute(Insert(lead.clone())).await {
            Ok(_) => {
                if let Err(e) = self
                    .database()
                    .execute(Delete(By::<lead::Draft, _>::new(lead.id)))
                    .await
                {
                    log::warn!(
                        "cannot remove delivered `lead::Draft(id: {})`: {e}",
                        lead.id,
                    );
                }
            }
            Err(e) => {
                log::warn!(
                    "cannot deliver `Lead(id: {})` immediately, \
                     leaving it queued: {e}",
                    lead.id,
                );
            }
        }

        Ok(contact)
    }
}

/// Error of [`SubmitEnquiry`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};

    use crate::{
        command::ReconcileAssignments,
        domain::{agent, lead, property, Agent, Property},
        infra::{database::mem::Mem, Database as _},
        Service,
    };

    use super::{Command as _, SubmitEnquiry};

    fn agent() -> Agent {
        Agent {
            id: agent::Id::new(),
            name: "Asha Rao".parse().unwrap(),
            email: None,
            phone: None,
            role: agent::Role::Agent,
            assigned_properties: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    fn property(assigned_agents: Vec<agent::Id>) -> Property {
        Property {
            id: property::Id::new(),
            title: "2BHK in Gachibowli".parse().unwrap(),
            city: "Hyderabad".parse().unwrap(),
            address: None,
            kind: property::Kind::Apartment,
            price: None,
            area: None,
            price_per_sqft: None,
            specifications: None,
            assigned_agents,
            amenities: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    fn enquiry(property_id: Option<property::Id>) -> SubmitEnquiry {
        SubmitEnquiry {
            name: "Ravi Kumar".parse().unwrap(),
            email: "ravi@example.com".parse().unwrap(),
            phone: Some("+91 9000000000".parse().unwrap()),
            message: "Is this still available?".parse().unwrap(),
            property_id,
        }
    }

    #[tokio::test]
    async fn persists_contact_and_delivers_lead() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let a = agent();
        let prop = property(vec![a.id]);
        db.execute(Insert(a.clone())).await.unwrap();
        db.execute(Insert(prop.clone())).await.unwrap();

        let contact = svc.execute(enquiry(Some(prop.id))).await.unwrap();

        assert!(db.contact(contact.id).is_some());
        let leads = db.leads();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].assigned_agents, [a.id]);
        assert_eq!(leads[0].source, lead::Source::PropertyContactForm);
        assert!(db.drafts().is_empty());
    }

    #[tokio::test]
    async fn contact_survives_lead_store_failure() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());
        db.fail_lead_inserts(true);

        let contact = svc.execute(enquiry(None)).await.unwrap();

        assert!(db.contact(contact.id).is_some());
        assert!(db.leads().is_empty());
        let drafts = db.drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].attempts, 0);
        assert_eq!(drafts[0].lead.source, lead::Source::GeneralContactForm);
    }

    #[tokio::test]
    async fn snapshot_is_unaffected_by_later_reassignment() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let (a1, a2) = (agent(), agent());
        let prop = property(vec![a1.id]);
        db.execute(Insert(a1.clone())).await.unwrap();
        db.execute(Insert(a2.clone())).await.unwrap();
        db.execute(Insert(prop.clone())).await.unwrap();

        _ = svc.execute(enquiry(Some(prop.id))).await.unwrap();
        _ = svc
            .execute(ReconcileAssignments {
                property_id: prop.id,
                agent_ids: vec![a2.id],
            })
            .await
            .unwrap();

        let leads = db.leads();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].assigned_agents, [a1.id]);
    }

    #[tokio::test]
    async fn errors_on_unknown_property() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let result = svc.execute(enquiry(Some(property::Id::new()))).await;

        assert!(result.is_err());
        assert!(db.drafts().is_empty());
        assert!(db.leads().is_empty());
    }
}
