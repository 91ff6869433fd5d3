//! HTTP API definitions.

pub mod agent;
pub mod contact;
pub mod property;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

/// Builds the [`Router`] serving the HTTP API.
///
/// The [`Service`] instance is expected to be provided as an [`Extension`]
/// layer.
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/agents", post(agent::create))
        .route("/agents/:id", delete(agent::delete))
        .route("/agents/:id/properties", put(agent::assign_properties))
        .route("/properties", post(property::create))
        .route(
            "/properties/:id",
            get(property::get).delete(property::delete),
        )
        .route("/properties/:id/agents", put(property::assign_agents))
        .route("/contact", post(contact::submit))
        .route("/contacts/:id/status", patch(contact::update_status))
}
