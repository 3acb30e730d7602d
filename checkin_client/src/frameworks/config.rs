use std::{env, path::PathBuf, time::Duration};

// Runtime settings, read from the environment (after .env is loaded).

// Name of the local store holding the session; becomes `<dir>/login_prefs.toml`.
pub const SESSION_STORE_NAME: &str = "login_prefs";
pub const INPUT_CHANNEL_CAPACITY: usize = 64;

pub fn api_base_url() -> String {
    env::var("TICKETS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000/api/v1/".to_string())
}

pub fn db_name() -> String {
    env::var("TICKETS_DB_NAME").unwrap_or_else(|_| "bedayia_school".to_string())
}

pub fn session_dir() -> PathBuf {
    env::var("TICKETS_SESSION_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".checkin"))
}

pub fn http_timeout() -> Duration {
    let millis = env::var("TICKETS_HTTP_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

// Whether the scanner is allowed to run; stands in for the camera permission.
pub fn scanner_enabled() -> bool {
    env::var("TICKETS_SCANNER_ENABLED")
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(true)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
