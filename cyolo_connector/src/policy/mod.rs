//! Policy payload construction
//!
//! Caller parameters arrive untyped. Before anything is submitted they are
//! normalized, and for updates they are merged into the policy as the
//! service currently has it. Fetched policies carry member lists as objects,
//! while submissions carry bare ids, so every mutation path goes through
//! [`project_policy`] first.

mod payload;
mod timed_access;

pub use payload::{create_payload, remove_users_payload, update_payload};
pub use timed_access::TimedAccess;

use serde_json::{Map, Value};

use crate::{
    consts::MEMBER_LIST_FIELDS,
    error::{CyoloError, Result},
};

/// Untyped operation parameters, keyed by field name.
pub type Params = Map<String, Value>;

/// Normalize raw caller parameters.
///
/// Empty strings and nulls are dropped (`false` is kept, it is meaningful
/// for toggles). Member list fields become lists of id strings.
pub fn build_policy_payload(params: &Params) -> Params {
    params
        .iter()
        .filter(|(_, v)| !is_blank(v))
        .map(|(k, v)| {
            if is_member_list(k) {
                (k.to_owned(), strings_to_value(to_id_list(v)))
            } else {
                (k.to_owned(), v.to_owned())
            }
        })
        .collect()
}

/// Replace the member objects of a fetched policy with their ids.
pub fn project_policy(policy: &Params) -> Params {
    policy
        .iter()
        .map(|(k, v)| match v {
            Value::Array(items) if is_member_list(k) => {
                (k.to_owned(), strings_to_value(project_ids(items)))
            }
            _ => (k.to_owned(), v.to_owned()),
        })
        .collect()
}

/// Find a policy by id in a policy listing.
pub fn find_policy<'a>(policies: &'a [Value], id: &str) -> Option<&'a Params> {
    policies
        .iter()
        .filter_map(Value::as_object)
        .find(|p| p.get("id").map(value_to_string).as_deref() == Some(id))
}

/// The policies in a listing response.
///
/// The service answers with a bare array; a `{"policies": [...]}`
/// envelope is accepted as well.
pub fn policies_in_listing(listing: &Value) -> Result<&[Value]> {
    match listing {
        Value::Array(items) => Ok(items),
        Value::Object(obj) => match obj.get("policies") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(CyoloError::Other(
                "policy listing has no policies array".to_owned(),
            )),
        },
        _ => Err(CyoloError::Other(
            "policy listing is not a JSON array".to_owned(),
        )),
    }
}

fn is_member_list(field: &str) -> bool {
    MEMBER_LIST_FIELDS.contains(&field)
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Coerce a member list parameter into id strings.
///
/// Lists are stringified element-wise, anything else is treated as a
/// comma separated string.
pub(crate) fn to_id_list(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        other => value_to_string(other)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

fn project_ids(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => obj.get("id").map(value_to_string),
            other => Some(value_to_string(other)),
        })
        .collect()
}

pub(crate) fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.to_owned(),
        other => other.to_string(),
    }
}

pub(crate) fn strings_to_value(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}
