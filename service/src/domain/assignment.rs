//! Assignment edge-set payloads.
//!
//! Describe one side of the agent↔property relation for bulk `Push`/`Pull`
//! edge writes. Both writes are idempotent: pushing an already present
//! reference or pulling an absent one is a no-op, which is what makes
//! reconciliation safely re-runnable.

use super::{agent, property};
#[cfg(doc)]
use super::{Agent, Property};

/// Set of [`Agent`]s whose `assigned_properties` should gain or lose one
/// [`Property`] reference.
#[derive(Clone, Debug)]
pub struct AgentsOfProperty {
    /// ID of the referenced [`Property`].
    pub property_id: property::Id,

    /// IDs of the [`Agent`]s to write the reference to.
    ///
    /// IDs resolving to no [`Agent`] match nothing and are silently
    /// ignored.
    pub agent_ids: Vec<agent::Id>,
}

/// Set of [`Property`]s whose `assigned_agents` should gain or lose one
/// [`Agent`] reference.
#[derive(Clone, Debug)]
pub struct PropertiesOfAgent {
    /// ID of the referenced [`Agent`].
    pub agent_id: agent::Id,

    /// IDs of the [`Property`]s to write the reference to.
    ///
    /// IDs resolving to no [`Property`] match nothing and are silently
    /// ignored.
    pub property_ids: Vec<property::Id>,
}
