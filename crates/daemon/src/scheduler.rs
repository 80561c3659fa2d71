// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polling scheduler (spec §4.7, C7): reconcile once on start, then
//! on every tick list runs, dispatch each `created` run with a pending
//! `request.json` to a worker bounded by `max_concurrent` permits, and
//! let the reconciler sweep again between polls.

use std::sync::Arc;
use std::time::Duration;

use td_adapters::Registry;
use td_core::{IdGen, SessionState};
use td_engine::reconcile;
use td_store::RunStore;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::DaemonError;

pub struct Scheduler<G: IdGen> {
    store: Arc<RunStore<G>>,
    registry: Arc<Registry>,
    config: Config,
}

impl<G: IdGen + Send + Sync + 'static> Scheduler<G> {
    pub fn new(store: Arc<RunStore<G>>, registry: Arc<Registry>, config: Config) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Run the scheduler loop until `shutdown` is signalled, then wait a
    /// bounded grace window for in-flight workers before returning (spec
    /// §4.7 point 3).
    #[instrument(skip(self, shutdown), fields(max_concurrent = self.config.max_concurrent))]
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), DaemonError> {
        reconcile(self.store.as_ref()).await?;
        info!("startup reconciliation complete");

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut workers: JoinSet<()> = JoinSet::new();
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms.max(1));

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(poll_interval) => {}
            }

            while workers.try_join_next().is_some() {}

            if let Err(e) = reconcile(self.store.as_ref()).await {
                warn!(error = %e, "reconciliation pass failed");
            }

            if let Err(e) = self.dispatch_ready_runs(&semaphore, &mut workers).await {
                warn!(error = %e, "failed to enumerate runs for dispatch");
            }
        }

        info!(worker_count = workers.len(), "shutdown requested, draining in-flight workers");
        let grace = poll_interval.saturating_mul(10).max(Duration::from_secs(5));
        let drained = tokio::time::timeout(grace, async {
            while workers.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!("grace window elapsed with workers still in flight, aborting remaining workers");
            workers.abort_all();
        }

        Ok(())
    }

    /// List runs, filter to `created` sessions with a pending request on
    /// disk, and spawn a worker for each one a concurrency permit can be
    /// acquired for without blocking (spec §4.7 point 2: "Dispatch is
    /// non-blocking: if all N slots are occupied, the scheduler simply
    /// loops again on the next tick").
    async fn dispatch_ready_runs(
        &self,
        semaphore: &Arc<Semaphore>,
        workers: &mut JoinSet<()>,
    ) -> Result<(), DaemonError> {
        let mut sessions = self.store.list_runs().await?;
        sessions.retain(|s| s.state == SessionState::Created);
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        for session in sessions {
            let layout = match self.store.layout_for(&session.run_id) {
                Ok(layout) => layout,
                Err(_) => continue,
            };
            let has_request = tokio::fs::try_exists(layout.request_json())
                .await
                .unwrap_or(false);
            if !has_request {
                continue;
            }

            let permit = match Arc::clone(semaphore).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let store = Arc::clone(&self.store);
            let registry = Arc::clone(&self.registry);
            let run_id = session.run_id.clone();
            workers.spawn(async move {
                let _permit = permit;
                match td_engine::process_run(store.as_ref(), registry.as_ref(), &run_id).await {
                    Ok(result) => {
                        info!(run_id = %run_id, status = ?result.status, "run dispatched to completion")
                    }
                    Err(e) => {
                        warn!(run_id = %run_id, error = %e, "run store became unwritable mid-run")
                    }
                }
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
