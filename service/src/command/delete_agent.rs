//! [`Command`] for deleting an [`Agent`].

use common::operations::{
    By, Commit, Delete, Lock, Pull, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, Agent, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Agent`].
///
/// Mirror of [`DeleteProperty`]: the agent's ID is removed from the
/// `assigned_agents` of every [`Property`] referencing it, in the same
/// transaction as the deletion itself.
///
/// [`Lead`] snapshots referencing the deleted [`Agent`] are left untouched
/// intentionally.
///
/// [`DeleteProperty`]: super::DeleteProperty
/// [`Lead`]: crate::domain::Lead
#[derive(Clone, Copy, Debug)]
pub struct DeleteAgent {
    /// ID of the [`Agent`] to be deleted.
    pub agent_id: agent::Id,
}

impl<Db> Command<DeleteAgent> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Lock<By<Agent, agent::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Agent>, agent::Id>>,
            Ok = Option<Agent>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Agent, agent::Id>>, Err = Traced<database::Error>>
        + Database<
            Pull<By<Property, agent::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Agent;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteAgent) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteAgent { agent_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize concurrent deletions of the same `Agent`.
        tx.execute(Lock(By::new(agent_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let agent = tx
            .execute(Select(By::<Option<Agent>, _>::new(agent_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AgentNotExists(agent_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Agent, _>::new(agent_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Cascade: drop the reference from every `Property` holding it.
        tx.execute(Pull(By::<Property, _>::new(agent_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(agent)
    }
}

/// Error of [`DeleteAgent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Agent`] with the provided ID does not exist.
    #[display("`Agent(id: {_0})` does not exist")]
    AgentNotExists(#[error(not(source))] agent::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};

    use crate::{
        domain::{agent, property, Agent, Property},
        infra::{database::mem::Mem, Database as _},
        Service,
    };

    use super::{Command as _, DeleteAgent};

    #[tokio::test]
    async fn cascades_into_properties() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let a = Agent {
            id: agent::Id::new(),
            name: "Vikram Shah".parse().unwrap(),
            email: None,
            phone: None,
            role: agent::Role::Agent,
            assigned_properties: vec![],
            created_at: DateTime::now().coerce(),
        };
        let prop = Property {
            id: property::Id::new(),
            title: "Farm land near Shamirpet".parse().unwrap(),
            city: "Hyderabad".parse().unwrap(),
            address: None,
            kind: property::Kind::FarmLand,
            price: None,
            area: None,
            price_per_sqft: None,
            specifications: None,
            assigned_agents: vec![a.id],
            amenities: vec![],
            created_at: DateTime::now().coerce(),
        };
        db.execute(Insert(a.clone())).await.unwrap();
        db.execute(Insert(prop.clone())).await.unwrap();

        let deleted =
            svc.execute(DeleteAgent { agent_id: a.id }).await.unwrap();

        assert_eq!(deleted.id, a.id);
        assert!(db.agent(a.id).is_none());
        assert!(db.property(prop.id).unwrap().assigned_agents.is_empty());

        let second = svc.execute(DeleteAgent { agent_id: a.id }).await;
        assert!(second.is_err());
    }
}
