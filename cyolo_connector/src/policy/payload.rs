//! Submission bodies for the policy mutating operations

use std::collections::HashSet;

use serde_json::Value;

use super::{build_policy_payload, project_policy, to_id_list, Params, TimedAccess};
use crate::{
    consts::{
        DEVICE_POSTURE_PARAM, DEVICE_POSTURE_SUBMISSION_FIELD, SUBMISSION_FIELDS,
        TIMED_ACCESS_FIELD, TIMED_ACCESS_PARAMS,
    },
    error::Result,
};

/// Body for creating a new policy.
pub fn create_payload(params: &Params) -> Result<Params> {
    let mut payload = build_policy_payload(params);
    let timed_access = TimedAccess::from_params(&payload, &TimedAccess::default())?;

    for key in TIMED_ACCESS_PARAMS {
        payload.remove(key);
    }
    if let Some(ids) = payload.remove(DEVICE_POSTURE_PARAM) {
        payload.insert(DEVICE_POSTURE_SUBMISSION_FIELD.to_owned(), ids);
    }
    payload.insert(
        TIMED_ACCESS_FIELD.to_owned(),
        serde_json::to_value(timed_access)?,
    );
    Ok(payload)
}

/// Body for updating `fetched` with the caller's parameters.
///
/// List fields are appended to (existing ids first, no de-duplication);
/// scalar fields are replaced when the caller supplies them. Objects in an
/// appended list are reduced to their ids so the list stays homogeneous.
/// Fails without building a body when the fetched schedule is unreadable.
pub fn update_payload(params: &Params, fetched: &Params) -> Result<Params> {
    let input = build_policy_payload(params);
    let existing = project_policy(fetched);
    let mut payload = Params::new();

    for field in SUBMISSION_FIELDS {
        let value = match (existing.get(field), input.get(field)) {
            (Some(Value::Array(current)), Some(new)) => {
                Value::Array(current.iter().map(id_or_value).chain(list_items(new)).collect())
            }
            (Some(Value::Array(current)), None) => Value::Array(current.to_owned()),
            (_, Some(new)) => new.to_owned(),
            (Some(current), None) => current.to_owned(),
            (None, None) => continue,
        };
        payload.insert(field.to_owned(), value);
    }

    let (current, new) = (
        existing.get(DEVICE_POSTURE_PARAM),
        input.get(DEVICE_POSTURE_PARAM),
    );
    if current.is_some() || new.is_some() {
        let posture = current
            .into_iter()
            .chain(new)
            .flat_map(list_items)
            .collect();
        payload.insert(
            DEVICE_POSTURE_SUBMISSION_FIELD.to_owned(),
            Value::Array(posture),
        );
    }

    let fallback = TimedAccess::from_existing(existing.get(TIMED_ACCESS_FIELD))?;
    payload.insert(
        TIMED_ACCESS_FIELD.to_owned(),
        serde_json::to_value(TimedAccess::from_params(&input, &fallback)?)?,
    );
    Ok(payload)
}

/// Body that resubmits `fetched` minus the caller's `users`.
pub fn remove_users_payload(params: &Params, fetched: &Params) -> Params {
    let input = build_policy_payload(params);
    let removed: HashSet<String> = input
        .get("users")
        .map(to_id_list)
        .unwrap_or_default()
        .into_iter()
        .collect();
    let existing = project_policy(fetched);

    let mut payload: Params = SUBMISSION_FIELDS
        .iter()
        .filter_map(|&field| {
            existing
                .get(field)
                .map(|v| (field.to_owned(), v.to_owned()))
        })
        .collect();

    if let Some(Value::Array(users)) = existing.get("users") {
        let kept = users
            .iter()
            .filter(|u| !u.as_str().map_or(false, |id| removed.contains(id)))
            .cloned()
            .collect();
        payload.insert("users".to_owned(), Value::Array(kept));
    }

    payload.insert(
        DEVICE_POSTURE_SUBMISSION_FIELD.to_owned(),
        Value::Array(
            existing
                .get(DEVICE_POSTURE_PARAM)
                .map(list_items)
                .unwrap_or_default(),
        ),
    );
    if let Some(timed_access) = existing.get(TIMED_ACCESS_FIELD) {
        payload.insert(TIMED_ACCESS_FIELD.to_owned(), timed_access.to_owned());
    }
    payload
}

fn id_or_value(item: &Value) -> Value {
    match item.get("id") {
        Some(Value::String(id)) => Value::String(id.to_owned()),
        Some(id @ Value::Number(_)) => Value::String(id.to_string()),
        _ => item.to_owned(),
    }
}

/// The elements a value contributes when appended to a list field.
fn list_items(v: &Value) -> Vec<Value> {
    match v {
        Value::Array(items) => items.to_owned(),
        Value::String(_) => to_id_list(v).into_iter().map(Value::String).collect(),
        other => vec![other.to_owned()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(v: Value) -> Params {
        v.as_object().unwrap().to_owned()
    }

    fn fetched_policy() -> Params {
        params(json!({
            "id": "p1",
            "name": "engineering",
            "enabled": true,
            "users": [{"id": "u1", "name": "ann"}, {"id": "u2", "name": "bob"}],
            "mappings": [{"id": "m1"}],
            "supervisors": [],
            "constraints": {"mfa": true},
            "ip_sources": ["10.0.0.0/8"],
            "device_posture_profiles": [{"id": "d1"}],
            "timed_access": {
                "enabled": true,
                "start": "08:00",
                "end": "18:00",
                "days": [false, true, true, true, true, true, false]
            },
            "created_at": "2023-01-01"
        }))
    }

    #[test]
    fn create_without_schedule_uses_defaults() {
        let payload = create_payload(&params(json!({"name": "new", "users": "u1,u2"}))).unwrap();
        assert_eq!(
            payload["timed_access"],
            json!({
                "enabled": false,
                "start": "00:00",
                "end": "00:00",
                "days": [false, false, false, false, false, false, false]
            })
        );
        assert_eq!(payload["users"], json!(["u1", "u2"]));
    }

    #[test]
    fn create_consumes_schedule_params() {
        let payload = create_payload(&params(json!({
            "name": "night shift",
            "timed_access_status": true,
            "start": "2023-03-01T22:00:00.000Z",
            "days": "Friday,Saturday",
            "device_posture_profiles": "d1, d2",
        })))
        .unwrap();
        for key in TIMED_ACCESS_PARAMS {
            assert!(!payload.contains_key(key), "{key} leaked into payload");
        }
        assert!(!payload.contains_key("device_posture_profiles"));
        assert_eq!(payload["device_posture_profile_ids"], json!(["d1", "d2"]));
        assert_eq!(
            payload["timed_access"],
            json!({
                "enabled": true,
                "start": "22:00",
                "end": "00:00",
                "days": [false, false, false, false, false, true, true]
            })
        );
    }

    #[test]
    fn update_appends_users_without_dedup() {
        let payload =
            update_payload(&params(json!({"users": ["u9", "u1"]})), &fetched_policy()).unwrap();
        assert_eq!(payload["users"], json!(["u1", "u2", "u9", "u1"]));
    }

    #[test]
    fn update_keeps_existing_ids_when_nothing_supplied() {
        let payload = update_payload(&params(json!({"users": ["u9"]})), &fetched_policy()).unwrap();
        assert_eq!(payload["users"], json!(["u1", "u2", "u9"]));
        assert_eq!(payload["mappings"], json!(["m1"]));
        assert_eq!(payload["supervisors"], json!([]));
        assert_eq!(payload["ip_sources"], json!(["10.0.0.0/8"]));
    }

    #[test]
    fn update_overrides_scalars_including_false() {
        let payload = update_payload(
            &params(json!({"enabled": false, "name": "", "constraints": {"mfa": false}})),
            &fetched_policy(),
        )
        .unwrap();
        assert_eq!(payload["enabled"], json!(false));
        // blank means not supplied
        assert_eq!(payload["name"], json!("engineering"));
        assert_eq!(payload["constraints"], json!({"mfa": false}));
    }

    #[test]
    fn update_only_submits_known_fields() {
        let payload = update_payload(&Params::new(), &fetched_policy()).unwrap();
        assert!(!payload.contains_key("id"));
        assert!(!payload.contains_key("created_at"));
        assert!(!payload.contains_key("device_posture_profiles"));
        assert!(!payload.contains_key("webhooks"));
    }

    #[test]
    fn update_merges_device_posture_ids() {
        let payload = update_payload(
            &params(json!({"device_posture_profiles": "d2"})),
            &fetched_policy(),
        )
        .unwrap();
        assert_eq!(payload["device_posture_profile_ids"], json!(["d1", "d2"]));
    }

    #[test]
    fn update_omits_device_posture_when_neither_side_has_it() {
        let mut fetched = fetched_policy();
        fetched.remove("device_posture_profiles");
        let payload = update_payload(&params(json!({"users": "u9"})), &fetched).unwrap();
        assert!(!payload.contains_key("device_posture_profile_ids"));

        let payload =
            update_payload(&params(json!({"device_posture_profiles": "d7"})), &fetched).unwrap();
        assert_eq!(payload["device_posture_profile_ids"], json!(["d7"]));
    }

    #[test]
    fn update_reduces_appended_objects_to_ids() {
        let mut fetched = fetched_policy();
        fetched.insert(
            "capabilities".to_owned(),
            json!([{"id": "c1", "name": "rdp"}, {"name": "no id"}]),
        );
        let payload = update_payload(&params(json!({"capabilities": "c2"})), &fetched).unwrap();
        assert_eq!(
            payload["capabilities"],
            json!(["c1", {"name": "no id"}, "c2"])
        );

        // nothing appended, the fetched list goes back as it was
        let payload = update_payload(&Params::new(), &fetched).unwrap();
        assert_eq!(payload["capabilities"], fetched["capabilities"]);
    }

    #[test]
    fn update_with_unreadable_schedule_fails() {
        let mut fetched = fetched_policy();
        fetched.insert(
            "timed_access".to_owned(),
            json!({"enabled": true, "days": [true]}),
        );
        let res = update_payload(&params(json!({"users": "u9"})), &fetched);
        assert!(matches!(res, Err(crate::error::CyoloError::Other(_))), "{res:?}");
    }

    #[test]
    fn update_schedule_falls_back_per_field() {
        let payload = update_payload(
            &params(json!({"start": "2023-01-01T09:15:00.000Z", "days": "Sunday"})),
            &fetched_policy(),
        )
        .unwrap();
        assert_eq!(
            payload["timed_access"],
            json!({
                "enabled": true,
                "start": "09:15",
                "end": "18:00",
                "days": [true, false, false, false, false, false, false]
            })
        );
    }

    #[test]
    fn remove_drops_only_named_users() {
        let mut fetched = fetched_policy();
        fetched.insert(
            "users".to_owned(),
            json!([{"id": "u1"}, {"id": "u2"}, {"id": "u3"}]),
        );
        let payload = remove_users_payload(&params(json!({"users": "u2"})), &fetched);
        assert_eq!(payload["users"], json!(["u1", "u3"]));

        let untouched = update_payload(&Params::new(), &fetched).unwrap();
        for field in SUBMISSION_FIELDS.iter().filter(|f| **f != "users") {
            assert_eq!(payload.get(*field), untouched.get(*field), "{field}");
        }
        assert_eq!(payload["timed_access"], fetched["timed_access"]);
        assert_eq!(payload["device_posture_profile_ids"], json!(["d1"]));
    }
}
