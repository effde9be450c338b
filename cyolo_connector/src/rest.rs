//! CyoloRestClient and the request executor behind every operation
//!

use std::time::Duration;

use cyolo_core::logging::{debug, error};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};

use crate::{
    consts,
    creds::CyoloCredentials,
    error::{CyoloError, Result},
};

/// A successful response from the service.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was empty or not JSON; handed back unchanged.
    Raw { status: u16, body: String },
}

impl ApiResponse {
    /// Flatten the response into a JSON value for the caller.
    pub fn into_value(self) -> Value {
        match self {
            ApiResponse::Json(v) => v,
            ApiResponse::Raw { status, body } => json!({ "status": status, "body": body }),
        }
    }

    /// The parsed JSON body, failing when the service sent something else.
    pub fn into_json(self) -> Result<Value> {
        match self {
            ApiResponse::Json(v) => Ok(v),
            ApiResponse::Raw { status, .. } => Err(CyoloError::Other(format!(
                "expected a JSON body in the {status} response"
            ))),
        }
    }
}

/// Wrapper struct for http functionality
pub struct CyoloRestClient {
    /// The credentials used to authenticate into Cyolo.
    credentials: CyoloCredentials,
    http_client: reqwest::Client,
}

impl CyoloRestClient {
    /// Initialize a new CyoloRestClient
    pub fn new(credentials: CyoloCredentials) -> Result<Self> {
        credentials.validate()?;
        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!credentials.verify_ssl)
            .timeout(Duration::from_secs(credentials.timeout_secs))
            .build()
            .map_err(|e| CyoloError::Config(format!("unable to build http client: {e}")))?;
        Ok(Self {
            credentials,
            http_client,
        })
    }

    /// The versioned API root, e.g. `https://cyolo.example.com/v1`.
    pub(crate) fn base_url(&self) -> String {
        base_url(&self.credentials.server_url)
    }

    /// Builds a request against an API endpoint
    pub(crate) fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> RequestBuilder {
        let request_url = format!("{}/{}", self.base_url(), endpoint);

        let mut req = self
            .http_client
            .request(method, request_url)
            .header(consts::ACCEPT_HEADER, "application/json")
            .header(
                consts::AUTH_HEADER,
                format!("Basic {}", self.credentials.api_key),
            );

        // Add body if exists
        if let Some(b) = body {
            req = req.json(b);
        }
        req
    }

    /// Send one request and translate the response.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        debug!("{method} {endpoint}");
        let request_label = format!("({method} {endpoint})");

        let resp = self
            .build_request(method, endpoint, body)
            .send()
            .await
            .map_err(|e| {
                error!("error with request {request_label}: {e}");
                CyoloError::from_transport(&e)
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            error!("error reading response body {request_label}: {e}");
            CyoloError::from_transport(&e)
        })?;

        if status.is_success() {
            return Ok(match serde_json::from_str::<Value>(&text) {
                Ok(v) => ApiResponse::Json(v),
                Err(_) => {
                    debug!("non-JSON body in {status} response {request_label}");
                    ApiResponse::Raw {
                        status: status.as_u16(),
                        body: text,
                    }
                }
            });
        }

        let err = CyoloError::Api {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            detail: error_detail(&text),
        };
        error!("error with request - bad response {request_label}: {err}");
        Err(err)
    }
}

/// Prefix a scheme when missing and append the API version.
pub(crate) fn base_url(server_url: &str) -> String {
    let server_url = server_url.trim_end_matches('/');
    if server_url.starts_with("https://") || server_url.starts_with("http://") {
        format!("{server_url}/{}", consts::API_VERSION)
    } else {
        format!("https://{server_url}/{}", consts::API_VERSION)
    }
}

/// The service's own explanation of a failure, if the body has one.
fn error_detail(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => match obj.get("error") {
            Some(Value::String(s)) => Some(s.to_owned()),
            Some(Value::Null) | None => Some(body.to_owned()),
            Some(other) => Some(other.to_string()),
        },
        _ => Some(body.to_owned()),
    }
}
