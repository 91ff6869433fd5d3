//! [`Agent`]-related HTTP handlers.

use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};
use service::{
    command::{
        self, AssignPropertiesToAgent, CreateAgent, DeleteAgent,
    },
    domain::{agent, property, Agent},
    read, Command as _,
};

use crate::{define_error, AsError, Error, Service};

/// Wire shape of an [`Agent`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentBody {
    /// ID of the [`Agent`].
    pub id: agent::Id,

    /// Name of the [`Agent`].
    pub name: String,

    /// Email address of the [`Agent`], if any.
    pub email: Option<String>,

    /// Phone number of the [`Agent`], if any.
    pub phone: Option<String>,

    /// Role of the [`Agent`].
    pub role: String,

    /// IDs of the assigned properties.
    pub assigned_properties: Vec<property::Id>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<Agent> for AgentBody {
    fn from(a: Agent) -> Self {
        Self {
            id: a.id,
            name: a.name.to_string(),
            email: a.email.map(|e| e.to_string()),
            phone: a.phone.map(|p| p.to_string()),
            role: a.role.to_string(),
            assigned_properties: a.assigned_properties,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Wire shape of an [`Agent`] summary embedded into assignment responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBody {
    /// ID of the [`Agent`].
    pub id: agent::Id,

    /// Name of the [`Agent`].
    pub name: String,

    /// Email address of the [`Agent`], if any.
    pub email: Option<String>,

    /// Phone number of the [`Agent`], if any.
    pub phone: Option<String>,
}

impl From<read::agent::Summary> for SummaryBody {
    fn from(s: read::agent::Summary) -> Self {
        Self {
            id: s.id,
            name: s.name.to_string(),
            email: s.email.map(|e| e.to_string()),
            phone: s.phone.map(|p| p.to_string()),
        }
    }
}

/// Request body of [`create()`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Name of the new [`Agent`].
    pub name: String,

    /// Email address of the new [`Agent`].
    pub email: Option<String>,

    /// Phone number of the new [`Agent`].
    pub phone: Option<String>,

    /// Role of the new [`Agent`], `AGENT` if omitted.
    pub role: Option<String>,
}

/// `POST /agents` handler.
///
/// # Errors
///
/// - 400 on a malformed field;
/// - 500 on a store failure.
pub async fn create(
    Extension(service): Extension<Service>,
    Json(req): Json<CreateRequest>,
) -> Result<(http::StatusCode, Json<AgentBody>), Error> {
    let CreateRequest {
        name,
        email,
        phone,
        role,
    } = req;

    let agent = service
        .execute(CreateAgent {
            name: name
                .parse()
                .map_err(|e| Error::validation(&format!("`name`: {e}")))?,
            email: email
                .map(|e| {
                    e.parse().map_err(|e| {
                        Error::validation(&format!("`email`: {e}"))
                    })
                })
                .transpose()?,
            phone: phone
                .map(|p| {
                    p.parse().map_err(|e| {
                        Error::validation(&format!("`phone`: {e}"))
                    })
                })
                .transpose()?,
            role: role
                .map(|r| {
                    r.parse::<agent::Role>().map_err(|_| {
                        Error::validation(&"unknown `role`")
                    })
                })
                .transpose()?
                .unwrap_or(agent::Role::Agent),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((http::StatusCode::CREATED, Json(agent.into())))
}

/// Request body of [`assign_properties()`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPropertiesRequest {
    /// IDs of the properties to be assigned, replacing the previous set.
    pub property_ids: Vec<property::Id>,
}

/// Response body of [`assign_properties()`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedBody {
    /// Human-readable confirmation.
    pub message: String,

    /// The [`Agent`] after reconciliation.
    pub agent: AgentBody,
}

/// `PUT /agents/:id/properties` handler.
///
/// # Errors
///
/// - 400 on a malformed ID;
/// - 404 if no [`Agent`] with the ID exists;
/// - 500 on a store failure.
pub async fn assign_properties(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    Json(req): Json<AssignPropertiesRequest>,
) -> Result<Json<AssignedBody>, Error> {
    let agent = service
        .execute(AssignPropertiesToAgent {
            agent_id: parse_id(&id)?,
            property_ids: req.property_ids,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(AssignedBody {
        message: "assigned properties updated".to_owned(),
        agent: agent.into(),
    }))
}

/// `DELETE /agents/:id` handler.
///
/// # Errors
///
/// - 400 on a malformed ID;
/// - 404 if no [`Agent`] with the ID exists;
/// - 500 on a store failure.
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<AgentBody>, Error> {
    let deleted = service
        .execute(DeleteAgent {
            agent_id: parse_id(&id)?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(deleted.into()))
}

/// Parses an [`agent::Id`] out of a path segment.
fn parse_id(id: &str) -> Result<agent::Id, Error> {
    id.parse()
        .map_err(|_| Error::validation(&"malformed `Agent` ID"))
}

define_error! {
    enum NotFoundError {
        #[code = "AGENT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Agent` with the provided ID does not exist"]
        Agent,

        #[code = "PROPERTY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the provided ID does not exist"]
        Property,
    }
}

impl AsError for command::assign_properties_to_agent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::AgentNotExists(_) => Some(NotFoundError::Agent.into()),
            Self::PropertyNotExists(_) => Some(NotFoundError::Property.into()),
        }
    }
}

impl AsError for command::delete_agent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::AgentNotExists(_) => Some(NotFoundError::Agent.into()),
        }
    }
}
