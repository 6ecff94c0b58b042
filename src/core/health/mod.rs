//! Health probing for registered providers

mod prober;

pub use prober::{HealthProber, ProbeSettings};
