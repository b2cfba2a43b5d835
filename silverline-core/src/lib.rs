//! Silverline Core Library
//!
//! Shared types, wire models, and errors for the Silverline IP-list client.
//! This crate is used by the CLI and by anything embedding the client.

pub mod api;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use api::*;
pub use error::*;
pub use types::*;
