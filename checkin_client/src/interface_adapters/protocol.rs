use serde::Serialize;
use serde_json::Value;

use crate::domain::{Ack, CheckinError, Invitee};

// Request payload for POST tickets/login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
    pub db: &'a str,
}

// Request payload for POST tickets/get_data.
#[derive(Debug, Serialize)]
pub struct GetDataRequest<'a> {
    pub invitees_qrcode_text: &'a str,
}

// Request payload for POST tickets/update_data; every invitee field is sent back.
#[derive(Debug, Serialize)]
pub struct UpdateDataRequest<'a> {
    pub invitees: &'a [Invitee],
}

// Request payload for POST tickets/logout.
#[derive(Debug, Serialize)]
pub struct LogoutRequest<'a> {
    pub api_key: &'a str,
    pub username: &'a str,
}

// Reads `{success: true, message: [{apikey}]}` into the issued key.
pub fn api_key_from_login(body: &Value) -> Result<String, CheckinError> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        return Err(CheckinError::Auth("invalid credentials".to_string()));
    }

    let first = body
        .get("message")
        .and_then(Value::as_array)
        .and_then(|messages| messages.first())
        .ok_or_else(|| CheckinError::Auth("empty response".to_string()))?;

    first
        .get("apikey")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CheckinError::Auth("no API key in response".to_string()))
}

// Takes the `message` array out of a get_data response.
pub fn invitees_from_get_data(body: Value) -> Result<Vec<Invitee>, CheckinError> {
    let Value::Object(mut envelope) = body else {
        return Err(CheckinError::Data(
            "no invitees data found in response".to_string(),
        ));
    };

    match envelope.remove("message") {
        Some(list @ Value::Array(_)) => {
            serde_json::from_value(list).map_err(|err| CheckinError::Parse(err.to_string()))
        }
        _ => Err(CheckinError::Data(
            "no invitees data found in response".to_string(),
        )),
    }
}

// Lenient ack: a 2xx body without `success` still counts as accepted.
pub fn ack_from(body: &Value) -> Ack {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(true);
    let message = body.get("message").map(|message| match message {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    });

    Ack { success, message }
}

// Pulls a readable message out of the backend's error bodies.
// The backend is inconsistent: `{error}`, `{message}` or `{"Access denied": "..."}`.
pub fn error_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    ["error", "message"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .or_else(|| object.values().find_map(Value::as_str))
        .map(str::to_string)
}
