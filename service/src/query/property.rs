//! [`Query`] collection related to a single [`Property`].

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{amenity, property, Amenity, Property},
    infra::{database, Database},
    read, Query, Service,
};

use super::DatabaseQuery;

/// Queries a [`Property`] by its [`property::Id`].
pub type ById = DatabaseQuery<By<Option<Property>, property::Id>>;

/// [`Query`] of a [`Property`] prepared for display.
///
/// Expands the property's amenity references into catalog records and
/// renders its specifications, producing a [`read::property::Listing`].
#[derive(Clone, Copy, Debug)]
pub struct Detailed {
    /// ID of the [`Property`] to query.
    pub id: property::Id,
}

impl<Db> Query<Detailed> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<amenity::Id, Amenity>, Vec<amenity::Id>>>,
            Ok = HashMap<amenity::Id, Amenity>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<read::property::Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Detailed { id }: Detailed,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(property) = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let mut resolved = self
            .database()
            .execute(Select(By::<HashMap<amenity::Id, Amenity>, _>::new(
                property.amenities.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;

        // Preserving the order of the property's reference list, with
        // dangling references skipped.
        let amenities = property
            .amenities
            .iter()
            .filter_map(|id| resolved.remove(id))
            .collect();

        let specifications = read::property::specifications(&property);

        Ok(Some(read::property::Listing {
            property,
            amenities,
            specifications,
        }))
    }
}
