//! [`Agent`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{
    By, Delete, Insert, Lock, Pull, Push, Select, Update,
};
use tracerr::Traced;

use crate::{
    domain::{agent, assignment, property, Agent},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<agent::Id, Agent>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[agent::Id]>,
{
    type Ok = HashMap<agent::Id, Agent>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<agent::Id, Agent>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[agent::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, name, email, phone, role, \
                   assigned_properties, \
                   created_at \
            FROM agents \
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
                    Agent {
                        id,
                        name: row.get("name"),
                        email: row.get("email"),
                        phone: row.get("phone"),
                        role: row.get("role"),
                        assigned_properties: row.get("assigned_properties"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Agent>, agent::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<agent::Id, Agent>, [agent::Id; 1]>>,
        Ok = HashMap<agent::Id, Agent>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Agent>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Agent>, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Agent>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Agent>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(agent): Insert<Agent>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(agent)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Agent>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(agent): Update<Agent>,
    ) -> Result<Self::Ok, Self::Err> {
        let Agent {
            id,
            name,
            email,
            phone,
            role,
            assigned_properties,
            created_at,
        } = agent;

        const SQL: &str = "\
            INSERT INTO agents (\
                id, name, email, phone, role, \
                assigned_properties, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::INT2, \
                $6::UUID[], \
                $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                role = EXCLUDED.role, \
                assigned_properties = EXCLUDED.assigned_properties, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &email,
                &phone,
                &role,
                &assigned_properties,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Agent, agent::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Agent, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: agent::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM agents \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Agent, agent::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Agent, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: agent::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO agents_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Push<assignment::AgentsOfProperty>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Push(assignment): Push<assignment::AgentsOfProperty>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::AgentsOfProperty {
            property_id,
            agent_ids,
        } = assignment;

        const SQL: &str = "\
            UPDATE agents \
            SET assigned_properties = assigned_properties || $2::UUID \
            WHERE id = ANY($1::UUID[]) \
              AND NOT ($2::UUID = ANY(assigned_properties))";
        self.exec(SQL, &[&agent_ids, &property_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Pull<assignment::AgentsOfProperty>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Pull(assignment): Pull<assignment::AgentsOfProperty>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::AgentsOfProperty {
            property_id,
            agent_ids,
        } = assignment;

        const SQL: &str = "\
            UPDATE agents \
            SET assigned_properties = \
                    array_remove(assigned_properties, $2::UUID) \
            WHERE id = ANY($1::UUID[])";
        self.exec(SQL, &[&agent_ids, &property_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Pull<By<Agent, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Pull(by): Pull<By<Agent, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            UPDATE agents \
            SET assigned_properties = \
                    array_remove(assigned_properties, $1::UUID) \
            WHERE $1::UUID = ANY(assigned_properties)";
        self.exec(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
