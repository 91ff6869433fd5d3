//! [`Command`] definition.

pub mod assign_agents_to_property;
pub mod assign_properties_to_agent;
pub mod create_agent;
pub mod create_property;
pub mod delete_agent;
pub mod delete_property;
pub mod reconcile_assignments;
pub mod submit_enquiry;
pub mod update_contact_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    assign_agents_to_property::AssignAgentsToProperty,
    assign_properties_to_agent::AssignPropertiesToAgent,
    create_agent::CreateAgent, create_property::CreateProperty,
    delete_agent::DeleteAgent, delete_property::DeleteProperty,
    reconcile_assignments::ReconcileAssignments, submit_enquiry::SubmitEnquiry,
    update_contact_status::UpdateContactStatus,
};
