//! Silverline CLI Library
//!
//! This library provides the core functionality for the Silverline IP-list
//! CLI tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::SilverlineClient`] which provides
//! programmatic access to the Silverline `ip_objects` endpoints.
//! Configuration types are also available via [`config::CliConfig`] and
//! [`config::ConfigBuilder`].
//!
//! ```no_run
//! use silverlinectl::client::SilverlineClient;
//! use silverline_core::types::ListType;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = SilverlineClient::with_config(
//!     "https://portal.f5silverline.com",
//!     "my-api-key",
//!     30,    // timeout in seconds
//!     true,  // verify TLS certificates
//!     false, // don't use system proxies
//!     false, // quiet
//! )?;
//!
//! let response = client.get_ip_objects(ListType::Denylist, None).await?;
//! println!("{} objects", response.into_objects().len());
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the Silverline IP-list API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

// Mock Silverline server used by the integration tests
#[doc(hidden)]
pub mod test_utils;
