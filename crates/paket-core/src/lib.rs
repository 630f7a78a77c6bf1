//! Core domain model for the paket delivery tracking service.
//!
//! Provides validated identifiers, the delivery aggregate with its status
//! lifecycle, the persistence abstraction (PostgreSQL-backed and in-memory
//! implementations), clock utilities for deterministic scheduling tests,
//! and identifier generation. All other crates build on these types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod ids;
pub mod models;
pub mod storage;
pub mod time;

pub use error::{CoreError, Result};
pub use ids::{IdProvider, UuidIdProvider};
pub use models::{
    Address, CustomerInfo, Delivery, DeliveryId, DeliveryStatus, OrderId, TrackingStatus,
};
pub use storage::{DeliveryStore, MemoryDeliveryStore, PgDeliveryStore};
pub use time::{Clock, RealClock, TestClock};
