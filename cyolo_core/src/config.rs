//! Connector configuration and credentials
//!
use std::fs;
use std::path::PathBuf;
use std::{collections::HashMap, fmt::Display};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use yaml_peg::serde as yaml;

/// The user-defined namespace corresponding to the connector.
#[derive(Clone, Deserialize, Debug, Hash, PartialEq, Eq, Default, PartialOrd, Ord, Serialize)]
pub struct ConnectorNamespace(pub String);

impl Display for ConnectorNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-secret configuration for a connector.
#[derive(Clone, Deserialize, Serialize, Default, Debug)]
pub struct ConnectorConfig {
    /// The connector type
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Additional configuration, specific to the connector
    #[serde(flatten)]
    pub config: HashMap<String, String>,
}

impl ConnectorConfig {
    /// Basic constructor
    pub fn new(connector_type: String, config: HashMap<String, String>) -> Self {
        Self {
            connector_type,
            config,
        }
    }
}

/// Alias for HashMap to hold credentials information.
pub type CredentialsMap = HashMap<String, String>;

/// Fetch the credentials for every connector namespace in a connectors file.
pub fn fetch_credentials(path: PathBuf) -> Result<HashMap<String, CredentialsMap>> {
    debug!("Trying to read credentials from {:?}", path);
    let credentials_raw =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    parse_credentials(&credentials_raw)
}

/// Parse the contents of a connectors file.
pub fn parse_credentials(raw: &str) -> Result<HashMap<String, CredentialsMap>> {
    let mut config = yaml::from_str::<HashMap<String, CredentialsMap>>(raw)
        .context("deserializing credentials")?;

    config
        .pop()
        .ok_or_else(|| anyhow!["failed to generate credentials"])
}
