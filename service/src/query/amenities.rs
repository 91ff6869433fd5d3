//! [`Query`] collection related to multiple [`Amenity`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{amenity, Amenity};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries multiple [`Amenity`]s by their [`amenity::Id`]s.
///
/// IDs resolving to no [`Amenity`] are absent from the result, so dangling
/// references expand to nothing rather than erroring.
pub type ByIds =
    DatabaseQuery<By<HashMap<amenity::Id, Amenity>, Vec<amenity::Id>>>;
