//! Per-provider usage statistics
//!
//! Counters are mutated by the dispatcher and the health prober and read
//! through immutable snapshots.

mod aggregator;

pub use aggregator::{HealthFlag, ProviderStats, StatsAggregator, StatsHandle};
