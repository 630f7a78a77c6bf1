//! Polling synchronization engine for pull-reconciled carriers.
//!
//! The engine periodically sweeps every delivery in a pollable status,
//! asks its carrier for the current tracking state, and delegates to the
//! status update workflow when the carrier reports something new. Push
//! carriers are skipped: their shipments are reconciled by webhooks.
//!
//! The engine owns its full lifecycle. [`SyncEngine::start`] runs one
//! immediate sweep and then repeats on a fixed interval;
//! [`SyncEngine::stop`] cancels the pending timer and waits for any
//! in-flight sweep to finish rather than aborting it. Sweeps need no
//! mutual exclusion: a delivery is only touched when the reported status
//! differs from the stored one, so overlapping or replayed sweeps
//! converge on the same state.

use std::{sync::Arc, time::Duration};

use paket_core::{
    models::DeliveryStatus,
    storage::DeliveryStore,
    time::Clock,
};
use paket_providers::ProviderRegistry;
use tokio::{sync::RwLock, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{error::Result, status::StatusUpdater};

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Time between the end of one scheduled sweep and the start of the
    /// next.
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(60) }
    }
}

/// Counters for a single sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Deliveries in a pollable status at sweep start.
    pub scanned: usize,
    /// Deliveries whose status changed this sweep.
    pub updated: usize,
    /// Deliveries whose carrier reported the stored status.
    pub unchanged: usize,
    /// Deliveries skipped because their carrier is unknown or push-only.
    pub skipped: usize,
    /// Deliveries whose carrier query or update failed.
    pub failed: usize,
}

/// Cumulative counters across every sweep since engine creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStats {
    /// Completed sweeps, scheduled and manual.
    pub sweeps: u64,
    /// Total deliveries scanned.
    pub scanned: u64,
    /// Total status updates applied.
    pub updated: u64,
    /// Total unchanged reports.
    pub unchanged: u64,
    /// Total skipped deliveries.
    pub skipped: u64,
    /// Total per-delivery failures.
    pub failed: u64,
}

/// Shared sweep logic, cloneable into the scheduler task.
#[derive(Clone)]
struct Sweeper {
    store: Arc<dyn DeliveryStore>,
    registry: Arc<ProviderRegistry>,
    updater: StatusUpdater,
    stats: Arc<RwLock<SyncStats>>,
}

impl Sweeper {
    /// Runs one sweep over every pollable delivery.
    ///
    /// Per-delivery failures are logged and counted but never abort the
    /// sweep; only a failure to list pollable deliveries surfaces as an
    /// error.
    async fn sweep(&self) -> Result<SweepStats> {
        let deliveries = self.store.find_by_status(DeliveryStatus::POLLABLE.to_vec()).await?;
        let mut stats = SweepStats { scanned: deliveries.len(), ..SweepStats::default() };
        debug!(count = stats.scanned, "sweeping pollable deliveries");

        for delivery in deliveries {
            let Some(handle) = self.registry.find(&delivery.provider) else {
                debug!(
                    delivery_id = %delivery.id,
                    provider = %delivery.provider,
                    "provider not registered, skipping"
                );
                stats.skipped += 1;
                continue;
            };
            let Some(provider) = handle.as_pull() else {
                // Push carriers reconcile via webhooks.
                stats.skipped += 1;
                continue;
            };

            match provider.tracking_status(delivery.tracking_number.clone()).await {
                Ok(report) if report.status != delivery.status => {
                    match self.updater.update(delivery.id.clone(), report.status).await {
                        Ok(update) => {
                            info!(
                                delivery_id = %update.delivery_id,
                                tracking_number = %delivery.tracking_number,
                                previous_status = %update.previous_status,
                                new_status = %update.new_status,
                                "sync applied carrier status"
                            );
                            stats.updated += 1;
                        },
                        Err(update_error) => {
                            error!(
                                delivery_id = %delivery.id,
                                error = %update_error,
                                "sync status update failed"
                            );
                            stats.failed += 1;
                        },
                    }
                },
                Ok(_) => {
                    stats.unchanged += 1;
                },
                Err(query_error) => {
                    error!(
                        delivery_id = %delivery.id,
                        tracking_number = %delivery.tracking_number,
                        provider = %delivery.provider,
                        error = %query_error,
                        "tracking query failed"
                    );
                    stats.failed += 1;
                },
            }
        }

        let mut cumulative = self.stats.write().await;
        cumulative.sweeps += 1;
        cumulative.scanned += stats.scanned as u64;
        cumulative.updated += stats.updated as u64;
        cumulative.unchanged += stats.unchanged as u64;
        cumulative.skipped += stats.skipped as u64;
        cumulative.failed += stats.failed as u64;

        Ok(stats)
    }
}

/// Scheduler loop: immediate sweep, then one per interval until cancelled.
///
/// Cancellation is only observed between sweeps, so an in-flight sweep
/// always runs to completion.
async fn run(
    sweeper: Sweeper,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    cancellation_token: CancellationToken,
) {
    if let Err(sweep_error) = sweeper.sweep().await {
        error!(error = %sweep_error, "initial sync sweep failed");
    }

    loop {
        tokio::select! {
            () = clock.sleep(poll_interval) => {
                if let Err(sweep_error) = sweeper.sweep().await {
                    error!(error = %sweep_error, "scheduled sync sweep failed");
                }
            }
            () = cancellation_token.cancelled() => break,
        }
    }

    info!("sync engine scheduler stopped");
}

/// Polling synchronization engine.
pub struct SyncEngine {
    sweeper: Sweeper,
    config: SyncConfig,
    clock: Arc<dyn Clock>,
    cancellation_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SyncEngine {
    /// Creates an engine over the store, registry, and status updater.
    ///
    /// The clock drives sweep scheduling only; delivery timestamps come
    /// from the wall clock at mutation time.
    pub fn new(
        store: Arc<dyn DeliveryStore>,
        registry: Arc<ProviderRegistry>,
        updater: StatusUpdater,
        clock: Arc<dyn Clock>,
        config: SyncConfig,
    ) -> Self {
        Self {
            sweeper: Sweeper {
                store,
                registry,
                updater,
                stats: Arc::new(RwLock::new(SyncStats::default())),
            },
            config,
            clock,
            cancellation_token: CancellationToken::new(),
            handle: None,
        }
    }

    /// Starts the scheduler task.
    ///
    /// The first sweep runs immediately; calling `start` on a running
    /// engine logs a warning and does nothing.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            warn!("sync engine already running");
            return;
        }

        info!(poll_interval_secs = self.config.poll_interval.as_secs(), "starting sync engine");
        self.handle = Some(tokio::spawn(run(
            self.sweeper.clone(),
            Arc::clone(&self.clock),
            self.config.poll_interval,
            self.cancellation_token.clone(),
        )));
    }

    /// Stops the scheduler and waits for it to finish.
    ///
    /// Cancels the pending timer; an in-flight sweep completes before
    /// this returns. Safe to call on an engine that was never started.
    pub async fn stop(mut self) {
        info!("stopping sync engine");
        self.cancellation_token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(join_error) = handle.await {
                error!(error = %join_error, "sync engine scheduler panicked");
            }
        }
    }

    /// True once `start` has spawned the scheduler.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Runs a single sweep outside the schedule.
    ///
    /// Shares counters with scheduled sweeps. Useful for tests and for
    /// forcing reconciliation on demand.
    pub async fn sweep(&self) -> Result<SweepStats> {
        self.sweeper.sweep().await
    }

    /// Returns cumulative counters across all sweeps so far.
    pub async fn stats(&self) -> SyncStats {
        *self.sweeper.stats.read().await
    }
}
