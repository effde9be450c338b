//! The operations a host can dispatch to the connector

use std::{fmt::Display, str::FromStr};

use cyolo_core::logging::{error, info};
use reqwest::Method;
use serde_json::{json, Value};

use crate::{
    error::{CyoloError, Result},
    policy::{self, Params},
    CyoloConnector,
};

/// Every operation the connector understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetUsersList,
    GetUserByIdOrName,
    GetUserPolicy,
    DeleteUserByIdOrName,
    GetPolicyList,
    GetPolicyByIdOrName,
    CreatePolicy,
    UpdatePolicy,
    DeleteUserFromPolicy,
    GetSimpleGroupList,
    GetDynamicGroupList,
    GetConstraints,
    GetCapabilities,
    GetMappingsList,
    GetDevicePostureProfiles,
    GetMappingCategories,
    GetWebhooks,
    GetCertificates,
}

impl Operation {
    /// All operations, in the order they are listed to users.
    pub const ALL: [Operation; 18] = [
        Operation::GetUsersList,
        Operation::GetUserByIdOrName,
        Operation::GetUserPolicy,
        Operation::DeleteUserByIdOrName,
        Operation::GetPolicyList,
        Operation::GetPolicyByIdOrName,
        Operation::CreatePolicy,
        Operation::UpdatePolicy,
        Operation::DeleteUserFromPolicy,
        Operation::GetSimpleGroupList,
        Operation::GetDynamicGroupList,
        Operation::GetConstraints,
        Operation::GetCapabilities,
        Operation::GetMappingsList,
        Operation::GetDevicePostureProfiles,
        Operation::GetMappingCategories,
        Operation::GetWebhooks,
        Operation::GetCertificates,
    ];

    /// The name the host dispatches on.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetUsersList => "get_users_list",
            Operation::GetUserByIdOrName => "get_user_by_id_or_name",
            Operation::GetUserPolicy => "get_user_policy",
            Operation::DeleteUserByIdOrName => "delete_user_by_id_or_name",
            Operation::GetPolicyList => "get_policy_list",
            Operation::GetPolicyByIdOrName => "get_policy_by_id_or_name",
            Operation::CreatePolicy => "create_policy",
            Operation::UpdatePolicy => "update_policy",
            Operation::DeleteUserFromPolicy => "delete_user_from_policy",
            Operation::GetSimpleGroupList => "get_simple_group_list",
            Operation::GetDynamicGroupList => "get_dynamic_group_list",
            Operation::GetConstraints => "get_constraints",
            Operation::GetCapabilities => "get_capabilities",
            Operation::GetMappingsList => "get_mappings_list",
            Operation::GetDevicePostureProfiles => "get_device_posture_profiles",
            Operation::GetMappingCategories => "get_mapping_categories",
            Operation::GetWebhooks => "get_webhooks",
            Operation::GetCertificates => "get_certificates",
        }
    }

    /// Endpoint for the operations that are a single GET.
    fn list_endpoint(&self) -> Option<&'static str> {
        match self {
            Operation::GetUsersList => Some("users"),
            Operation::GetPolicyList => Some("policies"),
            Operation::GetSimpleGroupList => Some("simple_group"),
            Operation::GetDynamicGroupList => Some("dynamic_group"),
            Operation::GetConstraints => Some("constraints"),
            Operation::GetCapabilities => Some("capabilities"),
            Operation::GetMappingsList => Some("mappings"),
            Operation::GetDevicePostureProfiles => Some("device_posture_profiles"),
            Operation::GetMappingCategories => Some("mapping_category"),
            Operation::GetWebhooks => Some("webhooks"),
            Operation::GetCertificates => Some("certificates"),
            _ => None,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Operation {
    type Err = CyoloError;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| CyoloError::UnsupportedOperation(s.to_owned()))
    }
}

impl CyoloConnector {
    /// Run an operation by name.
    pub async fn run_named(&self, operation: &str, params: &Params) -> Result<Value> {
        let op = operation.parse::<Operation>().map_err(|e| {
            error!("{e}");
            e
        })?;
        self.run(op, params).await
    }

    /// Run an operation and return its result as JSON.
    pub async fn run(&self, op: Operation, params: &Params) -> Result<Value> {
        info!("running {op}");
        if let Some(endpoint) = op.list_endpoint() {
            return self.get(endpoint).await;
        }

        match op {
            Operation::GetUserByIdOrName => {
                self.get(&format!("users/{}", required_id(params)?)).await
            }
            Operation::GetUserPolicy => {
                self.get(&format!("users/{}/policies", required_id(params)?))
                    .await
            }
            Operation::GetPolicyByIdOrName => {
                self.get(&format!("policies/{}", required_id(params)?))
                    .await
            }
            Operation::DeleteUserByIdOrName => {
                let endpoint = format!("users/{}", required_id(params)?);
                self.rest_client
                    .execute(Method::DELETE, &endpoint, None)
                    .await?;
                Ok(json!({"status": "success", "result": "User successfully Deleted"}))
            }
            Operation::CreatePolicy => self.create_policy(params).await,
            Operation::UpdatePolicy => self.update_policy(params).await,
            Operation::DeleteUserFromPolicy => self.delete_user_from_policy(params).await,
            _ => Err(CyoloError::UnsupportedOperation(op.name().to_owned())),
        }
    }

    /// Create a policy from the caller's parameters.
    pub async fn create_policy(&self, params: &Params) -> Result<Value> {
        let payload = Value::Object(policy::create_payload(params)?);
        Ok(self
            .rest_client
            .execute(Method::PUT, "policies", Some(&payload))
            .await?
            .into_value())
    }

    /// Merge the caller's parameters into an existing policy.
    pub async fn update_policy(&self, params: &Params) -> Result<Value> {
        let id = required_id(params)?;
        let fetched = self.fetch_policy(&id).await?;
        let payload = Value::Object(policy::update_payload(params, &fetched)?);
        self.submit_policy(&id, &payload).await
    }

    /// Remove the caller's `users` from an existing policy.
    pub async fn delete_user_from_policy(&self, params: &Params) -> Result<Value> {
        let id = required_id(params)?;
        required(params, "users")?;
        let fetched = self.fetch_policy(&id).await?;
        let payload = Value::Object(policy::remove_users_payload(params, &fetched));
        self.submit_policy(&id, &payload).await
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        Ok(self
            .rest_client
            .execute(Method::GET, endpoint, None)
            .await?
            .into_value())
    }

    async fn submit_policy(&self, id: &str, payload: &Value) -> Result<Value> {
        Ok(self
            .rest_client
            .execute(Method::POST, &format!("policies/{id}"), Some(payload))
            .await?
            .into_value())
    }

    /// Fetch the full policy listing and pick out one policy.
    async fn fetch_policy(&self, id: &str) -> Result<Params> {
        let listing = self
            .rest_client
            .execute(Method::GET, "policies", None)
            .await?
            .into_json()?;
        policy::find_policy(policy::policies_in_listing(&listing)?, id)
            .cloned()
            .ok_or_else(|| {
                error!("policy {id} not found");
                CyoloError::PolicyNotFound(id.to_owned())
            })
    }
}

fn required<'a>(params: &'a Params, key: &str) -> Result<&'a Value> {
    match params.get(key) {
        None | Some(Value::Null) => Err(missing(key)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(missing(key)),
        Some(v) => Ok(v),
    }
}

fn required_id(params: &Params) -> Result<String> {
    required(params, "id").map(|v| policy::value_to_string(v).trim().to_owned())
}

fn missing(key: &str) -> CyoloError {
    CyoloError::InvalidParameter(format!("missing required parameter: {key}"))
}
