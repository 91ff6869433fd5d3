//! [`Command`] for assigning [`Property`]s to an [`Agent`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, property, Agent, Property},
    infra::{database, Database},
    Service,
};

use super::{reconcile_assignments, Command, ReconcileAssignments};

/// [`Command`] for assigning [`Property`]s to an [`Agent`].
///
/// Authoritative on the [`Agent`] side, yet expressed through the same
/// [`ReconcileAssignments`] primitive: every affected [`Property`] is
/// reconciled on its own, so the bidirectional invariant holds after each
/// step.
#[derive(Clone, Debug)]
pub struct AssignPropertiesToAgent {
    /// ID of the [`Agent`] to assign the [`Property`]s to.
    pub agent_id: agent::Id,

    /// IDs of the [`Property`]s to be assigned, replacing the previous set.
    ///
    /// IDs resolving to no [`Property`] are skipped silently.
    pub property_ids: Vec<property::Id>,
}

impl<Db> Command<AssignPropertiesToAgent> for Service<Db>
where
    Self: Command<
        ReconcileAssignments,
        Ok = Property,
        Err = Traced<reconcile_assignments::ExecutionError>,
    >,
    Db: Database<
            Select<By<Option<Agent>, agent::Id>>,
            Ok = Option<Agent>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Agent>, Err = Traced<database::Error>>,
{
    type Ok = Agent;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignPropertiesToAgent,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignPropertiesToAgent {
            agent_id,
            property_ids,
        } = cmd;

        let mut agent = self
            .database()
            .execute(Select(By::<Option<Agent>, _>::new(agent_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AgentNotExists(agent_id))
            .map_err(tracerr::wrap!())?;

        let mut desired = Vec::with_capacity(property_ids.len());
        for id in property_ids {
            if !desired.contains(&id) {
                desired.push(id);
            }
        }

        let removed = agent
            .assigned_properties
            .iter()
            .copied()
            .filter(|id| !desired.contains(id))
            .collect::<Vec<_>>();

        for property_id in removed {
            let Some(property) = self
                .database()
                .execute(Select(By::<Option<Property>, _>::new(property_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
            else {
                continue;
            };

            let agent_ids = property
                .assigned_agents
                .into_iter()
                .filter(|id| *id != agent_id)
                .collect();
            self.execute(ReconcileAssignments {
                property_id,
                agent_ids,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        }

        for &property_id in &desired {
            let Some(property) = self
                .database()
                .execute(Select(By::<Option<Property>, _>::new(property_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
            else {
                continue;
            };

            let mut agent_ids = property.assigned_agents;
            if !agent_ids.contains(&agent_id) {
                agent_ids.push(agent_id);
            }
            self.execute(ReconcileAssignments {
                property_id,
                agent_ids,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        }

        agent.assigned_properties = desired;
        self.database()
            .execute(Update(agent.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(agent)
    }
}

/// Error of [`AssignPropertiesToAgent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Agent`] with the provided ID does not exist.
    #[display("`Agent(id: {_0})` does not exist")]
    AgentNotExists(#[error(not(source))] agent::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}

impl From<reconcile_assignments::ExecutionError> for ExecutionError {
    fn from(e: reconcile_assignments::ExecutionError) -> Self {
        use reconcile_assignments::ExecutionError as E;

        match e {
            E::Db(e) => Self::Db(e),
            E::PropertyNotExists(id) => Self::PropertyNotExists(id),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};

    use crate::{
        domain::{agent, property, Agent, Property},
        infra::{database::mem::Mem, Database as _},
        Service,
    };

    use super::{AssignPropertiesToAgent, Command as _};

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

    fn property(title: &str) -> Property {
        Property {
            id: property::Id::new(),
            title: title.parse().unwrap(),
            city: "Hyderabad".parse().unwrap(),
            address: None,
            kind: property::Kind::OpenPlot,
            price: None,
            area: None,
            price_per_sqft: None,
            specifications: None,
            assigned_agents: vec![],
            amenities: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn replaces_assignment_on_both_sides() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let mut a = agent();
        let (mut p1, mut p2, p3) = (
            property("Plot 1"),
            property("Plot 2"),
            property("Plot 3"),
        );
        a.assigned_properties = vec![p1.id, p2.id];
        p1.assigned_agents = vec![a.id];
        p2.assigned_agents = vec![a.id];
        db.execute(Insert(a.clone())).await.unwrap();
        for p in [&p1, &p2, &p3] {
            db.execute(Insert(p.clone())).await.unwrap();
        }

        let updated = svc
            .execute(AssignPropertiesToAgent {
                agent_id: a.id,
                property_ids: vec![p2.id, p3.id],
            })
            .await
            .unwrap();

        assert_eq!(updated.assigned_properties, [p2.id, p3.id]);
        assert!(db.property(p1.id).unwrap().assigned_agents.is_empty());
        assert_eq!(db.property(p2.id).unwrap().assigned_agents, [a.id]);
        assert_eq!(db.property(p3.id).unwrap().assigned_agents, [a.id]);
    }

    #[tokio::test]
    async fn skips_dangling_property_ids() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let a = agent();
        let p = property("Plot 1");
        db.execute(Insert(a.clone())).await.unwrap();
        db.execute(Insert(p.clone())).await.unwrap();

        let ghost = property::Id::new();
        let updated = svc
            .execute(AssignPropertiesToAgent {
                agent_id: a.id,
                property_ids: vec![p.id, ghost],
            })
            .await
            .unwrap();

        assert_eq!(updated.assigned_properties, [p.id, ghost]);
        assert_eq!(db.property(p.id).unwrap().assigned_agents, [a.id]);
        assert!(db.property(ghost).is_none());
    }

    #[tokio::test]
    async fn errors_on_missing_agent() {
        let svc = Service::stub(Mem::default());

        let result = svc
            .execute(AssignPropertiesToAgent {
                agent_id: agent::Id::new(),
                property_ids: vec![],
            })
            .await;

        assert!(result.is_err());
    }
}
