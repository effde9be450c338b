use cyolo_core::logging::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime, Time};

use super::{value_to_string, Params};
use crate::{
    consts::{DAY_NAMES, DEFAULT_TIME_OF_DAY},
    error::{CyoloError, Result},
};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
const TIME_OF_DAY_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

/// The schedule during which a policy is enforceable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimedAccess {
    pub enabled: bool,
    pub start: String,
    pub end: String,
    /// Sunday first.
    pub days: [bool; 7],
}

impl Default for TimedAccess {
    fn default() -> Self {
        Self {
            enabled: false,
            start: DEFAULT_TIME_OF_DAY.to_owned(),
            end: DEFAULT_TIME_OF_DAY.to_owned(),
            days: [false; 7],
        }
    }
}

impl TimedAccess {
    /// Read the schedule of a fetched policy.
    ///
    /// Missing keys take their defaults; a schedule of the wrong shape is
    /// an error so that it is never resubmitted as the default.
    pub fn from_existing(v: Option<&Value>) -> Result<Self> {
        match v {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(v) => serde_json::from_value(v.to_owned()).map_err(|e| {
                error!("unreadable timed_access on fetched policy: {e}");
                CyoloError::Other(format!("unreadable timed_access on fetched policy: {e}"))
            }),
        }
    }

    /// Build the schedule from normalized caller parameters.
    ///
    /// Every part the caller leaves out comes from `fallback`.
    pub fn from_params(params: &Params, fallback: &TimedAccess) -> Result<Self> {
        let enabled = match params.get("timed_access_status") {
            Some(v) => parse_status(v)?,
            None => fallback.enabled,
        };
        let start = match params.get("start") {
            Some(v) => time_of_day(&value_to_string(v))?,
            None => fallback.start.to_owned(),
        };
        let end = match params.get("end") {
            Some(v) => time_of_day(&value_to_string(v))?,
            None => fallback.end.to_owned(),
        };
        let days = match params.get("days") {
            Some(v) => day_mask(&days_string(v)),
            None => fallback.days,
        };
        Ok(Self {
            enabled,
            start,
            end,
            days,
        })
    }
}

/// Mark each day whose name occurs in the raw string.
///
/// This is a substring test, so a value like "Mondays" still marks Monday.
pub fn day_mask(raw: &str) -> [bool; 7] {
    let mut mask = [false; 7];
    for (slot, day) in mask.iter_mut().zip(DAY_NAMES) {
        *slot = raw.contains(day);
    }
    mask
}

fn days_string(v: &Value) -> String {
    match v {
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => value_to_string(other),
    }
}

/// Reduce a `YYYY-MM-DDTHH:MM:SS.mmmZ` timestamp to `HH:MM`.
///
/// A value that is already `HH:MM` is passed through.
pub fn time_of_day(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let time = match PrimitiveDateTime::parse(raw, TIMESTAMP_FORMAT) {
        Ok(dt) => dt.time(),
        Err(_) => Time::parse(raw, TIME_OF_DAY_FORMAT).map_err(|e| {
            CyoloError::InvalidParameter(format!("unrecognized time {raw:?}: {e}"))
        })?,
    };
    time.format(TIME_OF_DAY_FORMAT)
        .map_err(|e| CyoloError::Other(e.to_string()))
}

fn parse_status(v: &Value) -> Result<bool> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(CyoloError::InvalidParameter(format!(
            "timed_access_status must be a boolean, got {other}"
        ))),
    }
}
