//! [`Contact`]-related HTTP handlers.

use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, SubmitEnquiry, UpdateContactStatus},
    domain::{contact, property, Contact},
    Command as _,
};

use crate::{define_error, AsError, Error, Service};

/// Wire shape of a [`Contact`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
    /// ID of the [`Contact`].
    pub id: contact::Id,

    /// Name of the enquirer.
    pub name: String,

    /// Email address of the enquirer.
    pub email: String,

    /// Phone number of the enquirer, if any.
    pub phone: Option<String>,

    /// Message of the enquiry.
    pub message: String,

    /// ID of the property the enquiry is about, if any.
    pub property_id: Option<property::Id>,

    /// Processing status of the [`Contact`].
    pub status: String,

    /// RFC 3339 submission timestamp.
    pub created_at: String,
}

impl From<Contact> for ContactBody {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name.to_string(),
            email: c.email.to_string(),
            phone: c.phone.map(|p| p.to_string()),
            message: c.message.to_string(),
            property_id: c.property_id,
            status: c.status.to_string(),
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Request body of [`submit()`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Name of the enquirer.
    pub name: String,

    /// Email address of the enquirer.
    pub email: String,

    /// Phone number of the enquirer.
    pub phone: Option<String>,

    /// Message of the enquiry.
    pub message: String,

    /// ID of the property the enquiry is about.
    pub property_id: Option<String>,
}

/// `POST /contact` handler.
///
/// # Errors
///
/// - 400 on a malformed field or ID;
/// - 404 if the referenced property does not exist;
/// - 500 on a store failure.
pub async fn submit(
    Extension(service): Extension<Service>,
    Json(req): Json<SubmitRequest>,
) -> Result<(http::StatusCode, Json<ContactBody>), Error> {
    let SubmitRequest {
        name,
        email,
        phone,
        message,
        property_id,
    } = req;

    let contact = service
        .execute(SubmitEnquiry {
            name: name
                .parse()
                .map_err(|e| Error::validation(&format!("`name`: {e}")))?,
            email: email
                .parse()
                .map_err(|e| Error::validation(&format!("`email`: {e}")))?,
            phone: phone
                .map(|p| {
                    p.parse().map_err(|e| {
                        Error::validation(&format!("`phone`: {e}"))
                    })
                })
                .transpose()?,
            message: message
                .parse()
                .map_err(|e| Error::validation(&format!("`message`: {e}")))?,
            property_id: property_id
                .map(|id| {
                    id.parse::<property::Id>().map_err(|_| {
                        Error::validation(&"malformed `Property` ID")
                    })
                })
                .transpose()?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((http::StatusCode::CREATED, Json(contact.into())))
}

/// Request body of [`update_status()`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// New processing status of the [`Contact`].
    pub status: String,
}

/// `PATCH /contacts/:id/status` handler.
///
/// # Errors
///
/// - 400 on a malformed ID or status;
/// - 404 if no [`Contact`] with the ID exists;
/// - 500 on a store failure.
pub async fn update_status(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ContactBody>, Error> {
    let contact = service
        .execute(UpdateContactStatus {
            contact_id: id.parse().map_err(|_| {
                Error::validation(&"malformed `Contact` ID")
            })?,
            status: req.status.parse().map_err(|_| {
                Error::validation(&"unknown `status`")
            })?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(contact.into()))
}

define_error! {
    enum NotFoundError {
        #[code = "CONTACT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Contact` with the provided ID does not exist"]
        Contact,

        #[code = "PROPERTY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the provided ID does not exist"]
        Property,
    }
}

impl AsError for command::submit_enquiry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(NotFoundError::Property.into()),
        }
    }
}

impl AsError for command::update_contact_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ContactNotExists(_) => Some(NotFoundError::Contact.into()),
        }
    }
}
