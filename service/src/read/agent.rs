//! [`Agent`]-related read definitions.

use crate::domain::{agent, Agent};

/// Display summary of an [`Agent`], as embedded into assignment responses.
#[derive(Clone, Debug)]
pub struct Summary {
    /// ID of the [`Agent`].
    pub id: agent::Id,

    /// [`agent::Name`] of the [`Agent`].
    pub name: agent::Name,

    /// [`agent::Email`] of the [`Agent`], if any.
    pub email: Option<agent::Email>,

    /// [`agent::Phone`] of the [`Agent`], if any.
    pub phone: Option<agent::Phone>,
}

impl From<Agent> for Summary {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name,
            email: agent.email,
            phone: agent.phone,
        }
    }
}
