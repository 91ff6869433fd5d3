//! [`DeliverLeads`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Insert, Perform, Select, Start, Update};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{lead, Lead},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`DeliverLeads`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between outbox drains.
    pub interval: time::Duration,

    /// Maximum number of [`lead::Draft`]s delivered per drain.
    pub batch: u16,
}

/// [`Task`] draining the [`lead::Draft`] outbox.
///
/// Every tick selects the next batch of queued [`lead::Draft`]s,
/// least-retried first, and for each inserts its [`Lead`] and removes the
/// draft. A failed delivery increments the draft's attempt counter and
/// leaves it queued for the next tick.
///
/// Replay-safe: the [`Lead`] insert upserts by its ID, so a crash between
/// the insert and the draft removal only causes a harmless rewrite.
#[derive(Clone, Copy, Debug)]
pub struct DeliverLeads<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<DeliverLeads<Self>, Config>>> for Service<Db>
where
    DeliverLeads<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<DeliverLeads<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = DeliverLeads {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::DeliverLeads` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for DeliverLeads<Service<Db>>
where
    Db: Database<
            Select<By<Vec<lead::Draft>, lead::draft::Batch>>,
            Ok = Vec<lead::Draft>,
            Err = Traced<database::Error>,
        > + Database<Insert<Lead>, Err = Traced<database::Error>>
        + Database<
            Delete<By<lead::Draft, lead::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<lead::Draft>, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let db = self.service.database();

        let drafts = db
            .execute(Select(By::<Vec<lead::Draft>, _>::new(
                lead::draft::Batch {
                    limit: self.config.batch,
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        for mut draft in drafts {
            let lead_id = draft.lead.id;
            let delivered = match db.execute(Insert(draft.lead.clone())).await
            {
                Ok(_) => true,
                Err(e) => {
                    log::error!(
                        "cannot deliver `Lead(id: {lead_id})` \
                         (attempt {}): {e}",
                        draft.attempts + 1,
                    );
                    false
                }
            };

            if delivered {
                db.execute(Delete(By::<lead::Draft, _>::new(lead_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!())
                    .map(drop)?;
            } else {
                draft.attempts += 1;
                db.execute(Update(draft))
                    .await
                    .map_err(tracerr::map_from_and_wrap!())
                    .map(drop)?;
            }
        }

        Ok(())
    }
}

/// Error of [`DeliverLeads`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use std::time;

    use common::{
        operations::{Insert, Perform},
        DateTime,
    };

    use crate::{
        domain::{lead, Lead},
        infra::{database::mem::Mem, Database as _},
        Service,
    };

    use super::{Config, DeliverLeads, Task as _};

    fn lead() -> Lead {
        Lead {
            id: lead::Id::new(),
            name: "Ravi Kumar".parse().unwrap(),
            email: "ravi@example.com".parse().unwrap(),
            phone: None,
            message: "Is this still available?".parse().unwrap(),
            property_id: None,
            assigned_agents: vec![],
            status: lead::Status::New,
            priority: lead::Priority::Low,
            source: lead::Source::GeneralContactForm,
            notes: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    fn task(db: &Mem) -> DeliverLeads<Service<Mem>> {
        DeliverLeads {
            config: Config {
                interval: time::Duration::from_secs(60),
                batch: 16,
            },
            service: Service::stub(db.clone()),
        }
    }

    #[tokio::test]
    async fn delivers_queued_drafts() {
        let db = Mem::default();

        let lead = lead();
        db.execute(Insert(lead::Draft::new(lead.clone())))
            .await
            .unwrap();

        task(&db).execute(Perform(())).await.unwrap();

        let leads = db.leads();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, lead.id);
        assert!(db.drafts().is_empty());
    }

    #[tokio::test]
    async fn keeps_failed_drafts_with_bumped_attempts() {
        let db = Mem::default();
        db.fail_lead_inserts(true);

        db.execute(Insert(lead::Draft::new(lead())))
            .await
            .unwrap();

        task(&db).execute(Perform(())).await.unwrap();

        assert!(db.leads().is_empty());
        let drafts = db.drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].attempts, 1);
    }
}
