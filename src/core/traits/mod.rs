//! Core traits module
//!
//! The adapter contract and the error translation seam shared by adapters.

pub mod error_mapper;
pub mod provider;

pub use error_mapper::ErrorMapper;
pub use provider::LLMProvider;
