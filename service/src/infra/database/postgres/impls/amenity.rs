//! [`Amenity`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{amenity, Amenity},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<amenity::Id, Amenity>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[amenity::Id]>,
{
    type Ok = HashMap<amenity::Id, Amenity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<amenity::Id, Amenity>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[amenity::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, name, icon, created_at \
            FROM amenities \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Amenity {
                        id,
                        name: row.get("name"),
                        icon: row.get("icon"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Insert<Amenity>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(amenity): Insert<Amenity>,
    ) -> Result<Self::Ok, Self::Err> {
        let Amenity {
            id,
            name,
            icon,
            created_at,
        } = amenity;

        const SQL: &str = "\
            INSERT INTO amenities (id, name, icon, created_at) \
            VALUES ($1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TIMESTAMPTZ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                icon = EXCLUDED.icon, \
                created_at = EXCLUDED.created_at";
        self.exec(SQL, &[&id, &name, &icon, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
