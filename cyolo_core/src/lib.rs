//!
//! Core pieces shared by the Cyolo connector crates
//!
//! Provides the connector trait, credential loading and logging setup.
#![deny(missing_docs)]

pub use config::fetch_credentials;
pub use connectors::Connector;

pub mod config;
pub mod connectors;
pub mod logging;
pub mod project;
