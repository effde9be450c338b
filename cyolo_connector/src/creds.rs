use cyolo_core::config::CredentialsMap;

use crate::consts::DEFAULT_TIMEOUT_SECS;
use crate::error::{CyoloError, Result};

/// Credentials and connection settings for a Cyolo server.
///
/// The user sets these up in their connectors file, under the
/// namespace chosen for the connector.
#[derive(Debug, Clone)]
pub struct CyoloCredentials {
    pub server_url: String,
    pub api_key: String,
    pub verify_ssl: bool,
    pub timeout_secs: u64,
}

impl Default for CyoloCredentials {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            api_key: String::new(),
            verify_ssl: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CyoloCredentials {
    /// Read the credentials from a flat config map.
    pub fn from_map(credentials: &CredentialsMap) -> Result<Self> {
        let mut creds = CyoloCredentials::default();
        for (k, v) in credentials.iter() {
            match k.as_str() {
                "server_url" => creds.server_url = v.trim().to_owned(),
                "api_key" => creds.api_key = v.to_owned(),
                "verify_ssl" => creds.verify_ssl = parse_flag(k, v)?,
                "timeout_secs" => {
                    creds.timeout_secs = v
                        .trim()
                        .parse()
                        .map_err(|_| CyoloError::Config(format!("{k} must be a number: {v}")))?
                }
                _ => (),
            }
        }
        creds.validate()?;
        Ok(creds)
    }

    /// Perform simple field validation to catch bad input.
    pub fn validate(&self) -> Result<()> {
        let missing = [("server_url", &self.server_url), ("api_key", &self.api_key)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(CyoloError::Config(format!(
                "Cyolo config missing required fields: {missing:?}"
            )));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CyoloError::Config(format!(
            "{key} must be true or false: {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> CredentialsMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn required_fields_load() {
        let creds =
            CyoloCredentials::from_map(&map(&[("server_url", "cyolo.io"), ("api_key", "k")]))
                .unwrap();
        assert_eq!(creds.server_url, "cyolo.io");
        assert!(creds.verify_ssl);
        assert_eq!(creds.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn optional_settings_parse() {
        let creds = CyoloCredentials::from_map(&map(&[
            ("server_url", "cyolo.io"),
            ("api_key", "k"),
            ("verify_ssl", "False"),
            ("timeout_secs", "5"),
        ]))
        .unwrap();
        assert!(!creds.verify_ssl);
        assert_eq!(creds.timeout_secs, 5);
    }

    #[test]
    fn missing_api_key_fails() {
        let err = CyoloCredentials::from_map(&map(&[("server_url", "cyolo.io")])).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn bad_flag_fails() {
        let err = CyoloCredentials::from_map(&map(&[
            ("server_url", "cyolo.io"),
            ("api_key", "k"),
            ("verify_ssl", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CyoloError::Config(_)));
    }
}
