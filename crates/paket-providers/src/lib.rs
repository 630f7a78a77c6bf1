//! Shipping provider abstraction, registry, and carrier simulators.
//!
//! This crate defines the carrier-facing seam of the delivery tracker. A
//! carrier integration implements [`ShippingProvider`] (and [`PullProvider`]
//! when it supports tracking queries), gets wrapped in a [`ProviderHandle`]
//! tagged with its reconciliation mode, and is registered in a
//! [`ProviderRegistry`] at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   select()   ┌─────────────────┐
//! │ ProviderRegistry │─────────────▶│ ProviderHandle  │
//! └──────────────────┘              │  Push | Pull    │
//!          │ find(name)             └─────────────────┘
//!          ▼                           │           │
//! ┌──────────────────┐        generate_label  tracking_status
//! │ Sync engine,     │                │        (pull only)
//! │ creation flow    │                ▼           ▼
//! └──────────────────┘           SwiftLine     NovaPost
//! ```
//!
//! The push/pull split is decided at registration time and carried in the
//! handle's variant, so downstream code matches on the tag instead of
//! probing capabilities at runtime.
//!
//! Two in-process simulators, [`NovaPost`] (pull) and [`SwiftLine`] (push),
//! stand in for real carrier APIs with randomized availability, latency,
//! and failure behavior.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod novapost;
pub mod provider;
pub mod registry;
pub mod swiftline;

pub use error::{ProviderError, Result};
pub use novapost::NovaPost;
pub use provider::{ProviderHandle, ProviderKind, PullProvider, ShippingLabel, ShippingProvider};
pub use registry::ProviderRegistry;
pub use swiftline::SwiftLine;
