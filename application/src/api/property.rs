//! [`Property`]-related HTTP handlers.

use axum::{extract::Path, Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        self, AssignAgentsToProperty, CreateProperty, DeleteProperty,
    },
    domain::{agent, amenity, property, Property},
    query, read, Command as _, Query as _,
};

use crate::{api::agent::SummaryBody, define_error, AsError, Error, Service};

/// Wire shape of a [`Property`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBody {
    /// ID of the [`Property`].
    pub id: property::Id,

    /// Title of the [`Property`].
    pub title: String,

    /// City the [`Property`] is located in.
    pub city: String,

    /// Street address of the [`Property`], if known.
    pub address: Option<String>,

    /// Kind of the [`Property`].
    pub kind: String,

    /// Asking price of the [`Property`].
    pub price: Option<Decimal>,

    /// Area of the [`Property`] in square feet.
    pub area: Option<Decimal>,

    /// Derived price per square foot.
    pub price_per_sqft: Option<Decimal>,

    /// Type-specific specifications of the [`Property`], as stored.
    pub specifications: Option<property::Specifications>,

    /// IDs of the assigned agents.
    pub assigned_agents: Vec<agent::Id>,

    /// IDs of the referenced amenities.
    pub amenities: Vec<amenity::Id>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<Property> for PropertyBody {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            title: p.title.to_string(),
            city: p.city.to_string(),
            address: p.address.map(|a| a.to_string()),
            kind: p.kind.to_string(),
            price: p.price.map(Into::into),
            area: p.area.map(Into::into),
            price_per_sqft: p.price_per_sqft.map(Into::into),
            specifications: p.specifications,
            assigned_agents: p.assigned_agents,
            amenities: p.amenities,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Request body of [`create()`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Title of the new [`Property`].
    pub title: String,

    /// City the new [`Property`] is located in.
    pub city: String,

    /// Street address of the new [`Property`].
    pub address: Option<String>,

    /// Kind of the new [`Property`].
    pub kind: String,

    /// Asking price of the new [`Property`].
    pub price: Option<Decimal>,

    /// Area of the new [`Property`] in square feet.
    pub area: Option<Decimal>,

    /// Type-specific specifications of the new [`Property`].
    pub specifications: Option<property::Specifications>,

    /// IDs of the referenced amenities.
    #[serde(default)]
    pub amenities: Vec<amenity::Id>,
}

/// `POST /properties` handler.
///
/// # Errors
///
/// - 400 on a malformed field;
/// - 500 on a store failure.
pub async fn create(
    Extension(service): Extension<Service>,
    Json(req): Json<CreateRequest>,
) -> Result<(http::StatusCode, Json<PropertyBody>), Error> {
    let CreateRequest {
        title,
        city,
        address,
        kind,
        price,
        area,
        specifications,
        amenities,
    } = req;

    let property = service
        .execute(CreateProperty {
            title: title
                .parse()
                .map_err(|e| Error::validation(&format!("`title`: {e}")))?,
            city: city
                .parse()
                .map_err(|e| Error::validation(&format!("`city`: {e}")))?,
            address: address
                .map(|a| {
                    a.parse().map_err(|e| {
                        Error::validation(&format!("`address`: {e}"))
                    })
                })
                .transpose()?,
            kind: kind
                .parse()
                .map_err(|_| Error::validation(&"unknown `kind`"))?,
            price: price
                .map(|p| {
                    property::Price::new(p)
                        .ok_or_else(|| Error::validation(&"invalid `price`"))
                })
                .transpose()?,
            area: area
                .map(|a| {
                    property::Area::new(a)
                        .ok_or_else(|| Error::validation(&"invalid `area`"))
                })
                .transpose()?,
            specifications,
            amenities,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((http::StatusCode::CREATED, Json(property.into())))
}

/// Wire shape of a resolved [`Amenity`].
///
/// [`Amenity`]: service::domain::Amenity
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityBody {
    /// ID of the amenity.
    pub id: amenity::Id,

    /// Name of the amenity.
    pub name: String,

    /// Icon identifier of the amenity, if any.
    pub icon: Option<String>,
}

/// Wire shape of rendered specifications.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationsBody {
    /// Whether any specifications are available.
    pub available: bool,

    /// Rendered display groups, in declaration order.
    pub groups: Vec<GroupBody>,
}

/// Wire shape of a single rendered specification field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBody {
    /// Raw field key.
    pub key: String,

    /// Human-readable label derived from the key.
    pub label: String,

    /// Display bullets of the field's value.
    pub bullets: Vec<String>,
}

impl From<read::property::Specifications> for SpecificationsBody {
    fn from(specs: read::property::Specifications) -> Self {
        use read::property::Specifications as S;

        match specs {
            S::Unavailable => Self {
                available: false,
                groups: vec![],
            },
            S::Groups(groups) => Self {
                available: true,
                groups: groups
                    .into_iter()
                    .map(|g| GroupBody {
                        key: g.key,
                        label: g.label,
                        bullets: g.bullets,
                    })
                    .collect(),
            },
        }
    }
}

/// Wire shape of a [`Property`] prepared for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingBody {
    /// The [`Property`] itself.
    #[serde(flatten)]
    pub property: PropertyBody,

    /// Resolved amenity records, dangling references omitted.
    pub resolved_amenities: Vec<AmenityBody>,

    /// Rendered specifications of the [`Property`].
    pub rendered_specifications: SpecificationsBody,
}

impl From<read::property::Listing> for ListingBody {
    fn from(listing: read::property::Listing) -> Self {
        Self {
            property: listing.property.into(),
            resolved_amenities: listing
                .amenities
                .into_iter()
                .map(|a| AmenityBody {
                    id: a.id,
                    name: a.name.to_string(),
                    icon: a.icon.map(|i| i.to_string()),
                })
                .collect(),
            rendered_specifications: listing.specifications.into(),
        }
    }
}

/// `GET /properties/:id` handler.
///
/// # Errors
///
/// - 400 on a malformed ID;
/// - 404 if no [`Property`] with the ID exists;
/// - 500 on a store failure.
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<ListingBody>, Error> {
    let id = parse_id(&id)?;

    let listing = service
        .execute(query::property::Detailed { id })
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| Error::from(NotFoundError::Property))?;

    Ok(Json(listing.into()))
}

/// Request body of [`assign_agents()`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignAgentsRequest {
    /// IDs of the agents to be assigned, replacing the previous set.
    pub agent_ids: Vec<agent::Id>,
}

/// Response body of [`assign_agents()`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedBody {
    /// The [`Property`] after reconciliation.
    pub property: PropertyBody,

    /// Summaries of the assigned agents that resolved.
    pub agents: Vec<SummaryBody>,
}

/// `PUT /properties/:id/agents` handler.
///
/// # Errors
///
/// - 400 on a malformed ID;
/// - 404 if no [`Property`] with the ID exists;
/// - 500 on a store failure.
pub async fn assign_agents(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    Json(req): Json<AssignAgentsRequest>,
) -> Result<Json<AssignedBody>, Error> {
    let assigned = service
        .execute(AssignAgentsToProperty {
            property_id: parse_id(&id)?,
            agent_ids: req.agent_ids,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(AssignedBody {
        property: assigned.property.into(),
        agents: assigned.agents.into_iter().map(Into::into).collect(),
    }))
}

/// `DELETE /properties/:id` handler.
///
/// # Errors
///
/// - 400 on a malformed ID;
/// - 404 if no [`Property`] with the ID exists;
/// - 500 on a store failure.
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<PropertyBody>, Error> {
    let deleted = service
        .execute(DeleteProperty {
            property_id: parse_id(&id)?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(deleted.into()))
}

/// Parses a [`property::Id`] out of a path segment.
fn parse_id(id: &str) -> Result<property::Id, Error> {
    id.parse()
        .map_err(|_| Error::validation(&"malformed `Property` ID"))
}

define_error! {
    enum NotFoundError {
        #[code = "PROPERTY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the provided ID does not exist"]
        Property,
    }
}

impl AsError for command::create_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SPECIFICATIONS_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "`Specifications` do not match the declared \
                             `Property` kind"]
                SpecificationsMismatch,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SpecificationsMismatch { .. } => {
                Some(Error::SpecificationsMismatch.into())
            }
        }
    }
}

impl AsError for command::assign_agents_to_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(NotFoundError::Property.into()),
        }
    }
}

impl AsError for command::delete_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(NotFoundError::Property.into()),
        }
    }
}
