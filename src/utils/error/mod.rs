//! Error handling
//!
//! [`GatewayError`] covers configuration, IO and server failures around the
//! dispatch path; provider failures are carried as [`ProviderError`] in the
//! `Provider` variant.
//!
//! [`ProviderError`]: crate::core::providers::ProviderError

pub mod error;

pub use error::*;
