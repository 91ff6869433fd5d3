//! Read model definitions.

pub mod agent;
pub mod property;
