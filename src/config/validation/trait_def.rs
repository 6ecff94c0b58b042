//! Validation trait definition

/// Implemented by every configuration section; errors are human-readable messages
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
