//! [`Command`] for creating a new [`Agent`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{agent, Agent},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Agent`].
///
/// No credential handling happens here: authentication is external to this
/// system.
#[derive(Clone, Debug)]
pub struct CreateAgent {
    /// [`agent::Name`] of a new [`Agent`].
    pub name: agent::Name,

    /// [`agent::Email`] of a new [`Agent`].
    pub email: Option<agent::Email>,

    /// [`agent::Phone`] of a new [`Agent`].
    pub phone: Option<agent::Phone>,

    /// [`agent::Role`] of a new [`Agent`].
    pub role: agent::Role,
}

impl<Db> Command<CreateAgent> for Service<Db>
where
    Db: Database<Insert<Agent>, Err = Traced<database::Error>>,
{
    type Ok = Agent;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateAgent) -> Result<Self::Ok, Self::Err> {
        let CreateAgent {
            name,
            email,
            phone,
            role,
        } = cmd;

        let agent = Agent {
            id: agent::Id::new(),
            name,
            email,
            phone,
            role,
            assigned_properties: vec![],
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(agent.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(agent)
    }
}

/// Error of [`CreateAgent`] [`Command`] execution.
pub type ExecutionError = database::Error;
