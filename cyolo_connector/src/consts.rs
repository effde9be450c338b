pub const AUTH_HEADER: &str = "Authorization";
pub const ACCEPT_HEADER: &str = "Accept";
pub const API_VERSION: &str = "v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Policy attributes holding references to other entities.
pub const MEMBER_LIST_FIELDS: [&str; 10] = [
    "mappings",
    "users",
    "supervisors",
    "webhooks",
    "simple_groups",
    "dynamic_groups",
    "mapping_categories",
    "group_supervisors",
    "device_posture_profiles",
    "trusted_certificates",
];

/// Fields resubmitted on every policy update.
pub const SUBMISSION_FIELDS: [&str; 14] = [
    "name",
    "enabled",
    "mappings",
    "users",
    "capabilities",
    "constraints",
    "supervisors",
    "webhooks",
    "simple_groups",
    "dynamic_groups",
    "mapping_categories",
    "group_supervisors",
    "ip_sources",
    "trusted_certificates",
];

/// Caller parameters consumed by the timed access encoder.
pub const TIMED_ACCESS_PARAMS: [&str; 4] = ["start", "end", "days", "timed_access_status"];

/// Sunday first, matching the service's day mask.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const DEVICE_POSTURE_PARAM: &str = "device_posture_profiles";
pub const DEVICE_POSTURE_SUBMISSION_FIELD: &str = "device_posture_profile_ids";
pub const TIMED_ACCESS_FIELD: &str = "timed_access";
pub const DEFAULT_TIME_OF_DAY: &str = "00:00";
