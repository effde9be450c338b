//! Path utilities for locating connector configuration.
//!
//! Credentials are looked up in the user's profile directory:
//!
//! ```text
//! ~
//!  └── .cyolo
//!       └── connectors.yaml
//! ```

use std::path::PathBuf;

use dirs::home_dir;
use lazy_static::lazy_static;

lazy_static! {
    static ref CONNECTOR_CFG: PathBuf = PathBuf::from("connectors.yaml");
    static ref PROFILE_CFG_DIR: PathBuf = PathBuf::from(".cyolo");
}

/// The default path to the connector credentials file.
///
/// Falls back to the working directory when no home directory is known.
pub fn connector_cfg_path() -> PathBuf {
    home_dir()
        .unwrap_or_default()
        .join(PROFILE_CFG_DIR.as_path())
        .join(CONNECTOR_CFG.as_path())
}
