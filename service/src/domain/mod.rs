//! Domain definitions.

pub mod agent;
pub mod amenity;
pub mod assignment;
pub mod contact;
pub mod lead;
pub mod property;

pub use self::{
    agent::Agent, amenity::Amenity, contact::Contact, lead::Lead,
    property::Property,
};
