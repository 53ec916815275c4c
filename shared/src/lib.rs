//! Shared types for the pet registry service
//!
//! Contains the wire shapes exchanged over HTTP (payload inputs, serialized
//! records, paginated pages), the shared error type and the logging utilities
//! used by every binary in the workspace.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use logging::Component;
pub use types::*;
