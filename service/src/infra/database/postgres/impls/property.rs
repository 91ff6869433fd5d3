//! [`Property`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{
    By, Delete, Insert, Lock, Pull, Push, Select, Update,
};
use tracerr::Traced;

use crate::{
    domain::{agent, assignment, property, Property},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<property::Id, Property>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Property>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, title, city, address, kind, \
                   price, area, price_per_sqft, \
                   specifications, \
                   assigned_agents, amenities, \
                   created_at \
            FROM properties \
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
                    Property {
                        id,
                        title: row.get("title"),
                        city: row.get("city"),
                        address: row.get("address"),
                        kind: row.get("kind"),
                        price: row.get("price"),
                        area: row.get("area"),
                        price_per_sqft: row.get("price_per_sqft"),
                        specifications: row
                            .get::<_, Option<serde_json::Value>>(
                                "specifications",
                            )
                            .map(serde_json::from_value)
                            .transpose()
                            .expect("valid `specifications` JSON"),
                        assigned_agents: row.get("assigned_agents"),
                        amenities: row.get("amenities"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<property::Id, Property>, [property::Id; 1]>>,
        Ok = HashMap<property::Id, Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            title,
            city,
            address,
            kind,
            price,
            area,
            price_per_sqft,
            specifications,
            assigned_agents,
            amenities,
            created_at,
        } = property;

        let specifications = specifications
            .map(serde_json::to_value)
            .transpose()
            .expect("`specifications` are JSON-serializable");

        const SQL: &str = "\
            INSERT INTO properties (\
                id, title, city, address, kind, \
                price, area, price_per_sqft, \
                specifications, \
                assigned_agents, amenities, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::INT2, \
                $6::NUMERIC, $7::NUMERIC, $8::NUMERIC, \
                $9::JSONB, \
                $10::UUID[], $11::UUID[], \
                $12::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                city = EXCLUDED.city, \
                address = EXCLUDED.address, \
                kind = EXCLUDED.kind, \
                price = EXCLUDED.price, \
                area = EXCLUDED.area, \
                price_per_sqft = EXCLUDED.price_per_sqft, \
                specifications = EXCLUDED.specifications, \
                assigned_agents = EXCLUDED.assigned_agents, \
                amenities = EXCLUDED.amenities, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &title,
                &city,
                &address,
                &kind,
                &price,
                &area,
                &price_per_sqft,
                &specifications,
                &assigned_agents,
                &amenities,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM properties \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO properties_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Push<assignment::PropertiesOfAgent>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Push(assignment): Push<assignment::PropertiesOfAgent>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::PropertiesOfAgent {
            agent_id,
            property_ids,
        } = assignment;

        const SQL: &str = "\
            UPDATE properties \
            SET assigned_agents = assigned_agents || $2::UUID \
            WHERE id = ANY($1::UUID[]) \
              AND NOT ($2::UUID = ANY(assigned_agents))";
        self.exec(SQL, &[&property_ids, &agent_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Pull<assignment::PropertiesOfAgent>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Pull(assignment): Pull<assignment::PropertiesOfAgent>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::PropertiesOfAgent {
            agent_id,
            property_ids,
        } = assignment;

        const SQL: &str = "\
            UPDATE properties \
            SET assigned_agents = array_remove(assigned_agents, $2::UUID) \
            WHERE id = ANY($1::UUID[])";
        self.exec(SQL, &[&property_ids, &agent_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Pull<By<Property, agent::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Pull(by): Pull<By<Property, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let agent_id: agent::Id = by.into_inner();

        const SQL: &str = "\
            UPDATE properties \
            SET assigned_agents = array_remove(assigned_agents, $1::UUID) \
            WHERE $1::UUID = ANY(assigned_agents)";
        self.exec(SQL, &[&agent_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
