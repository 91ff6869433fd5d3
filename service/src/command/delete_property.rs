//! [`Command`] for deleting a [`Property`].

use common::operations::{
    By, Commit, Delete, Lock, Pull, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, Agent, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Property`].
///
/// Cascades over the [`Agent`] side: the property's ID is removed from the
/// `assigned_properties` of every [`Agent`] referencing it, in the same
/// transaction as the deletion itself. The cascade is idempotent, and a
/// repeated deletion fails with [`ExecutionError::PropertyNotExists`]
/// without changing anything.
///
/// [`Lead`] snapshots referencing the deleted [`Property`] are left
/// untouched intentionally.
///
/// [`Lead`]: crate::domain::Lead
#[derive(Clone, Copy, Debug)]
pub struct DeleteProperty {
    /// ID of the [`Property`] to be deleted.
    pub property_id: property::Id,
}

impl<Db> Command<DeleteProperty> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Property, property::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Property, property::Id>>,
            Err = Traced<database::Error>,
        > + Database<Pull<By<Agent, property::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteProperty { property_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize with assignment reconciliations of the same `Property`.
        tx.execute(Lock(By::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let property = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Property, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Cascade: drop the reference from every `Agent` holding it.
        tx.execute(Pull(By::<Agent, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`DeleteProperty`] [`Command`] execution.
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
        domain::{agent, property, Agent, Property},
        infra::{database::mem::Mem, Database as _},
        Service,
    };

    use super::{Command as _, DeleteProperty};

    #[tokio::test]
    async fn cascades_into_agents_and_rejects_second_delete() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let prop = Property {
            id: property::Id::new(),
            title: "Warehouse in Medchal".parse().unwrap(),
            city: "Hyderabad".parse().unwrap(),
            address: None,
            kind: property::Kind::Commercial,
            price: None,
            area: None,
            price_per_sqft: None,
            specifications: None,
            assigned_agents: vec![],
            amenities: vec![],
            created_at: DateTime::now().coerce(),
        };
        let a = Agent {
            id: agent::Id::new(),
            name: "Asha Rao".parse().unwrap(),
            email: None,
            phone: None,
            role: agent::Role::Agent,
            assigned_properties: vec![prop.id],
            created_at: DateTime::now().coerce(),
        };
        db.execute(Insert(prop.clone())).await.unwrap();
        db.execute(Insert(a.clone())).await.unwrap();

        let deleted = svc
            .execute(DeleteProperty {
                property_id: prop.id,
            })
            .await
            .unwrap();

        assert_eq!(deleted.id, prop.id);
        assert!(db.property(prop.id).is_none());
        assert!(db.agent(a.id).unwrap().assigned_properties.is_empty());

        let second = svc
            .execute(DeleteProperty {
                property_id: prop.id,
            })
            .await;
        assert!(second.is_err());
        assert!(db.agent(a.id).unwrap().assigned_properties.is_empty());
    }
}
