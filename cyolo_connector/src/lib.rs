//! Cyolo Connector
//!
//! Exposes user, group and access policy management of a Cyolo server
//! through named operations.
//!
//! ```no_run
//! use cyolo_core::config::{ConnectorConfig, CredentialsMap};
//! use cyolo_core::Connector;
//! use cyolo_connector::CyoloConnector;
//!
//! let credentials = CredentialsMap::from([
//!     ("server_url".to_owned(), "cyolo.example.com".to_owned()),
//!     ("api_key".to_owned(), "my-key".to_owned()),
//! ]);
//! let cyolo = CyoloConnector::new(&ConnectorConfig::default(), &credentials);
//! ```

mod consts;
mod creds;
mod error;
mod operations;
pub mod policy;
mod rest;

pub use creds::CyoloCredentials;
pub use error::{CyoloError, Result};
pub use operations::Operation;
pub use rest::{ApiResponse, CyoloRestClient};

use async_trait::async_trait;
use cyolo_core::{
    config::{ConnectorConfig, CredentialsMap},
    logging::error,
    Connector,
};
use serde_json::Map;

/// The main Cyolo Connector struct.
pub struct CyoloConnector {
    rest_client: CyoloRestClient,
}

impl CyoloConnector {
    /// Build a connector from already validated credentials.
    pub fn from_credentials(credentials: CyoloCredentials) -> Result<Self> {
        Ok(Self {
            rest_client: CyoloRestClient::new(credentials)?,
        })
    }

    /// Verify the server is reachable with the configured key.
    ///
    /// Any failure is reported as invalid credentials.
    pub async fn check_health(&self) -> Result<bool> {
        match self.run(Operation::GetUsersList, &Map::new()).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("Invalid Credentials: {e}");
                Err(CyoloError::InvalidCredentials)
            }
        }
    }
}

#[async_trait]
impl Connector for CyoloConnector {
    /// Validates the credentials and sets up the HTTP client.
    fn new(_config: &ConnectorConfig, credentials: &CredentialsMap) -> anyhow::Result<Box<Self>> {
        let creds = CyoloCredentials::from_map(credentials)?;
        Ok(Box::new(Self::from_credentials(creds)?))
    }

    async fn check(&self) -> bool {
        self.check_health().await.is_ok()
    }
}
