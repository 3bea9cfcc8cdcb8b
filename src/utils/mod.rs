//! Utilities Module
//!
//! Shared utilities for error handling, security, validation, and partial
//! updates used throughout the service.

pub mod error;
pub mod security;
pub mod update;
pub mod validation;

// Re-export commonly used utilities
pub use error::{AppError, AppResult, ErrorResponse};
pub use security::*;
pub use update::{FieldUpdates, FieldValue};
pub use validation::*;
