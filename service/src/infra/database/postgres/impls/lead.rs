//! [`Lead`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{lead, Lead},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reconstructs a [`Lead`] from a row of the `leads` or `lead_drafts` table.
///
/// Both tables share the [`Lead`] column set.
fn lead_from_row(row: &Row) -> Lead {
    Lead {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        message: row.get("message"),
        property_id: row.get("property_id"),
        assigned_agents: row.get("assigned_agents"),
        status: row.get("status"),
        priority: row.get("priority"),
        source: row.get("source"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Insert<Lead>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(lead): Insert<Lead>,
    ) -> Result<Self::Ok, Self::Err> {
        let Lead {
            id,
            name,
            email,
            phone,
            message,
            property_id,
            assigned_agents,
            status,
            priority,
            source,
            notes,
            created_at,
        } = lead;

        // Upsert by ID, so replaying a partially delivered draft is a
        // harmless rewrite.
        const SQL: &str = "\
            INSERT INTO leads (\
                id, name, email, phone, message, \
                property_id, assigned_agents, \
                status, priority, source, \
                notes, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, \
                $6::UUID, $7::UUID[], \
                $8::INT2, $9::INT2, $10::INT2, \
                $11::VARCHAR[], \
                $12::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                message = EXCLUDED.message, \
                property_id = EXCLUDED.property_id, \
                assigned_agents = EXCLUDED.assigned_agents, \
                status = EXCLUDED.status, \
                priority = EXCLUDED.priority, \
                source = EXCLUDED.source, \
                notes = EXCLUDED.notes, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &email,
                &phone,
                &message,
                &property_id,
                &assigned_agents,
                &status,
                &priority,
                &source,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Insert<lead::Draft>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<lead::Draft>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<lead::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(draft)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<lead::Draft>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(draft): Update<lead::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let lead::Draft { lead, attempts } = draft;
        let Lead {
            id,
            name,
            email,
            phone,
            message,
            property_id,
            assigned_agents,
            status,
            priority,
            source,
            notes,
            created_at,
        } = lead;

        let attempts = i16::try_from(attempts).expect("`attempts` overflow");

        const SQL: &str = "\
            INSERT INTO lead_drafts (\
                id, name, email, phone, message, \
                property_id, assigned_agents, \
                status, priority, source, \
                notes, \
                created_at, \
                attempts \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, \
                $6::UUID, $7::UUID[], \
                $8::INT2, $9::INT2, $10::INT2, \
                $11::VARCHAR[], \
                $12::TIMESTAMPTZ, \
                $13::INT2 \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET attempts = EXCLUDED.attempts";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &email,
                &phone,
                &message,
                &property_id,
                &assigned_agents,
                &status,
                &priority,
                &source,
                &notes,
                &created_at,
                &attempts,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<lead::Draft, lead::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<lead::Draft, lead::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: lead::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM lead_drafts \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<lead::Draft>, lead::draft::Batch>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<lead::Draft>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<lead::Draft>, lead::draft::Batch>>,
    ) -> Result<Self::Ok, Self::Err> {
        let lead::draft::Batch { limit } = by.into_inner();
        let limit = i32::from(limit);

        const SQL: &str = "\
            SELECT id, name, email, phone, message, \
                   property_id, assigned_agents, \
                   status, priority, source, \
                   notes, \
                   created_at, \
                   attempts \
            FROM lead_drafts \
            ORDER BY attempts ASC, created_at ASC \
            LIMIT $1::INT4";
        Ok(self
            .query(SQL, &[&limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| lead::Draft {
                lead: lead_from_row(&row),
                attempts: u16::try_from(row.get::<_, i16>("attempts"))
                    .expect("`attempts` underflow"),
            })
            .collect())
    }
}
