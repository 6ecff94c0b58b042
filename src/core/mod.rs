//! Core functionality for the gateway
//!
//! - `providers`: adapters, the closed `Provider` enum, registry and secrets
//! - `router`: dispatch with retry and ordered fallback
//! - `health`: concurrent connectivity probing
//! - `stats`: per-provider counters and snapshots
//! - `hub`: the facade owning all of the above

pub mod health;
pub mod hub;
pub mod providers;
pub mod router;
pub mod stats;
pub mod traits;
pub mod types;

pub use hub::{ProviderHub, ProviderSummary, ReconfigureReport};
