//! [`Command`] for assigning [`Agent`]s to a [`Property`].

use std::collections::HashMap;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, property, Agent, Property},
    infra::{database, Database},
    read, Service,
};

use super::{reconcile_assignments, Command, ReconcileAssignments};

/// [`Command`] for assigning [`Agent`]s to a [`Property`].
///
/// Delegates the pairwise mutation to [`ReconcileAssignments`] and expands
/// the resulting assignment into [`read::agent::Summary`]s.
#[derive(Clone, Debug)]
pub struct AssignAgentsToProperty {
    /// ID of the [`Property`] to assign the [`Agent`]s to.
    pub property_id: property::Id,

    /// IDs of the [`Agent`]s to be assigned, replacing the previous set.
    pub agent_ids: Vec<agent::Id>,
}

impl<Db> Command<AssignAgentsToProperty> for Service<Db>
where
    Self: Command<
        ReconcileAssignments,
        Ok = Property,
        Err = Traced<reconcile_assignments::ExecutionError>,
    >,
    Db: Database<
        Select<By<HashMap<agent::Id, Agent>, Vec<agent::Id>>>,
        Ok = HashMap<agent::Id, Agent>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::property::Assigned;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignAgentsToProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignAgentsToProperty {
            property_id,
            agent_ids,
        } = cmd;

        let property = self
            .execute(ReconcileAssignments {
                property_id,
                agent_ids,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut resolved = self
            .database()
            .execute(Select(By::<HashMap<agent::Id, Agent>, _>::new(
                property.assigned_agents.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Dangling IDs of the assignment produce no summary.
        let agents = property
            .assigned_agents
            .iter()
            .filter_map(|id| resolved.remove(id))
            .map(read::agent::Summary::from)
            .collect();

        Ok(read::property::Assigned { property, agents })
    }
}

/// Error of [`AssignAgentsToProperty`] [`Command`] execution.
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

    use super::{AssignAgentsToProperty, Command as _};

    fn agent(name: &str) -> Agent {
        Agent {
            id: agent::Id::new(),
            name: name.parse().unwrap(),
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
            title: "Villa in Kompally".parse().unwrap(),
            city: "Hyderabad".parse().unwrap(),
            address: None,
            kind: property::Kind::Villa,
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
    async fn returns_summaries_of_resolved_agents_only() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let (a1, a2) = (agent("Asha Rao"), agent("Vikram Shah"));
        let prop = property();
        db.execute(Insert(a1.clone())).await.unwrap();
        db.execute(Insert(a2.clone())).await.unwrap();
        db.execute(Insert(prop.clone())).await.unwrap();

        let ghost = agent::Id::new();
        let assigned = svc
            .execute(AssignAgentsToProperty {
                property_id: prop.id,
                agent_ids: vec![a1.id, ghost, a2.id],
            })
            .await
            .unwrap();

        assert_eq!(
            assigned.property.assigned_agents,
            [a1.id, ghost, a2.id],
        );
        let summary_ids =
            assigned.agents.iter().map(|a| a.id).collect::<Vec<_>>();
        assert_eq!(summary_ids, [a1.id, a2.id]);
    }

    #[tokio::test]
    async fn errors_on_missing_property() {
        let svc = Service::stub(Mem::default());

        let result = svc
            .execute(AssignAgentsToProperty {
                property_id: property::Id::new(),
                agent_ids: vec![agent::Id::new()],
            })
            .await;

        assert!(result.is_err());
    }
}
