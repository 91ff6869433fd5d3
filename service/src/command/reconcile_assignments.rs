//! [`Command`] for reconciling the assignment of a [`Property`].

use common::operations::{
    By, Commit, Lock, Pull, Push, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Agent;
use crate::{
    domain::{agent, assignment, property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for reconciling the assigned [`Agent`]s of a [`Property`].
///
/// The sole entry point mutating the agent↔property relation: full-replaces
/// the property's `assigned_agents` with the provided set and writes the
/// mirroring references on the [`Agent`] side, all inside one transaction
/// holding a per-[`Property`] lock. Conflicting concurrent calls serialize
/// on the lock, and the last committed reconciliation wins wholesale.
///
/// Idempotent: repeating a call with the same set converges to the same
/// state.
#[derive(Clone, Debug)]
pub struct ReconcileAssignments {
    /// ID of the [`Property`] whose assignment is reconciled.
    pub property_id: property::Id,

    /// IDs of the [`Agent`]s to be assigned.
    ///
    /// Deduplicated with the input order preserved. Elements are not
    /// validated for existence: edge writes against unknown [`Agent`] IDs
    /// match nothing.
    pub agent_ids: Vec<agent::Id>,
}

impl<Db> Command<ReconcileAssignments> for Service<Db>
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
            Pull<assignment::AgentsOfProperty>,
            Err = Traced<database::Error>,
        > + Database<
            Push<assignment::AgentsOfProperty>,
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReconcileAssignments,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReconcileAssignments {
            property_id,
            agent_ids,
        } = cmd;

        let mut desired = Vec::with_capacity(agent_ids.len());
        for id in agent_ids {
            if !desired.contains(&id) {
                desired.push(id);
            }
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize concurrent reconciliations of the same `Property`.
        tx.execute(Lock(By::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut property = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let removed = property
            .assigned_agents
            .iter()
            .copied()
            .filter(|id| !desired.contains(id))
            .collect::<Vec<_>>();

        if !removed.is_empty() {
            tx.execute(Pull(assignment::AgentsOfProperty {
                property_id,
                agent_ids: removed,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        }
        if !desired.is_empty() {
            tx.execute(Push(assignment::AgentsOfProperty {
                property_id,
                agent_ids: desired.clone(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        }

        property.assigned_agents = desired;
        tx.execute(Update(property.clone()))
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

/// Error of [`ReconcileAssignments`] [`Command`] execution.
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

    use super::{Command as _, ReconcileAssignments};

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

    fn property() -> Property {
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
            assigned_agents: vec![],
            amenities: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    async fn seed(db: &Mem, agents: &[&Agent], properties: &[&Property]) {
        for a in agents {
            db.execute(Insert((*a).clone())).await.unwrap();
        }
        for p in properties {
            db.execute(Insert((*p).clone())).await.unwrap();
        }
    }

    #[tokio::test]
    async fn replaces_assignment_on_both_sides() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let (a1, a2, a3) = (agent(), agent(), agent());
        let mut prop = property();
        prop.assigned_agents = vec![a1.id, a2.id];
        let mut a1 = a1;
        a1.assigned_properties = vec![prop.id];
        let mut a2 = a2;
        a2.assigned_properties = vec![prop.id];
        seed(&db, &[&a1, &a2, &a3], &[&prop]).await;

        let updated = svc
            .execute(ReconcileAssignments {
                property_id: prop.id,
                agent_ids: vec![a2.id, a3.id],
            })
            .await
            .unwrap();

        assert_eq!(updated.assigned_agents, [a2.id, a3.id]);
        assert!(db.agent(a1.id).unwrap().assigned_properties.is_empty());
        assert_eq!(db.agent(a2.id).unwrap().assigned_properties, [prop.id]);
        assert_eq!(db.agent(a3.id).unwrap().assigned_properties, [prop.id]);
    }

    #[tokio::test]
    async fn converges_when_repeated() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let a = agent();
        let prop = property();
        seed(&db, &[&a], &[&prop]).await;

        let cmd = ReconcileAssignments {
            property_id: prop.id,
            agent_ids: vec![a.id],
        };
        let first = svc.execute(cmd.clone()).await.unwrap();
        let second = svc.execute(cmd).await.unwrap();

        assert_eq!(first.assigned_agents, second.assigned_agents);
        assert_eq!(db.agent(a.id).unwrap().assigned_properties, [prop.id]);
    }

    #[tokio::test]
    async fn deduplicates_preserving_input_order() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let (a1, a2) = (agent(), agent());
        let prop = property();
        seed(&db, &[&a1, &a2], &[&prop]).await;

        let updated = svc
            .execute(ReconcileAssignments {
                property_id: prop.id,
                agent_ids: vec![a1.id, a1.id, a2.id, a1.id],
            })
            .await
            .unwrap();

        assert_eq!(updated.assigned_agents, [a1.id, a2.id]);
    }

    #[tokio::test]
    async fn keeps_unknown_agent_ids_without_edge_writes() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let prop = property();
        seed(&db, &[], &[&prop]).await;

        let ghost = agent::Id::new();
        let updated = svc
            .execute(ReconcileAssignments {
                property_id: prop.id,
                agent_ids: vec![ghost],
            })
            .await
            .unwrap();

        assert_eq!(updated.assigned_agents, [ghost]);
        assert!(db.agent(ghost).is_none());
    }

    #[tokio::test]
    async fn errors_on_missing_property() {
        let svc = Service::stub(Mem::default());

        let result = svc
            .execute(ReconcileAssignments {
                property_id: property::Id::new(),
                agent_ids: vec![],
            })
            .await;

        assert!(result.is_err());
    }
}
