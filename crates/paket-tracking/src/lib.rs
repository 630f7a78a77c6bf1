//! Delivery lifecycle workflows.
//!
//! This crate wires the domain model to the carrier seam and the store.
//! Four workflows cover the lifecycle:
//!
//! 1. **Creation** ([`DeliveryCreator`]) - validate, pick a carrier,
//!    purchase a label, persist a confirmed delivery.
//! 2. **Status update** ([`StatusUpdater`]) - the single transition point
//!    every mutation funnels through.
//! 3. **Webhook reconciliation** ([`WebhookReconciler`]) - apply carrier
//!    push notifications, replay-safe.
//! 4. **Polling sync** ([`SyncEngine`]) - periodically pull tracking state
//!    for carriers that support it.
//!
//! Workflows never mutate a `Delivery` outside the status update path, so
//! transition behavior stays in one place.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod create;
pub mod error;
pub mod status;
pub mod sync;
pub mod webhook;

pub use create::{CreateDeliveryRequest, DeliveryCreator, DeliveryLabel};
pub use error::{Result, TrackingError};
pub use status::{StatusUpdate, StatusUpdater};
pub use sync::{SweepStats, SyncConfig, SyncEngine, SyncStats};
pub use webhook::{WebhookNotification, WebhookOutcome, WebhookReconciler};
