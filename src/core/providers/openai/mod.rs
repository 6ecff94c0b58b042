//! OpenAI-compatible provider
//!
//! Chat-completions adapter used for both the hosted OpenAI API and local
//! OpenAI-compatible servers such as LM Studio.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use config::{OpenAIConfig, OpenAIFlavor};
pub use error::OpenAIErrorMapper;
pub use provider::OpenAIProvider;
