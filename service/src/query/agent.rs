//! [`Query`] collection related to a single [`Agent`].

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{agent, Agent};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Agent`] by its [`agent::Id`].
pub type ById = DatabaseQuery<By<Option<Agent>, agent::Id>>;

/// Queries multiple [`Agent`]s by their [`agent::Id`]s.
///
/// IDs resolving to no [`Agent`] are absent from the result.
pub type ByIds = DatabaseQuery<By<HashMap<agent::Id, Agent>, Vec<agent::Id>>>;
