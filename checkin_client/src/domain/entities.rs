use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// One invitee row returned for a scanned ticket.
// There is no standalone id: an invitee is identified by its position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitee {
    #[serde(rename = "main_invitee", default, deserialize_with = "null_as_default")]
    pub is_main_invitee: bool,
    #[serde(rename = "number_of_seats", default, deserialize_with = "null_as_default")]
    pub seat_count: u32,
    #[serde(
        rename = "invitees_qrcode_text",
        default,
        deserialize_with = "null_as_default"
    )]
    pub qr_code_text: String,
    #[serde(rename = "invitees_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        rename = "invitees_attendance",
        default,
        deserialize_with = "null_as_default"
    )]
    pub has_attended: bool,
    #[serde(
        rename = "invitees_attendance_time",
        default,
        deserialize_with = "timestamp_or_absent"
    )]
    pub attendance_timestamp: Option<String>,
}

impl Invitee {
    // Attendance time worth showing to staff; the backend sends "false" for unset values.
    pub fn visible_attendance_time(&self) -> Option<&str> {
        self.attendance_timestamp
            .as_deref()
            .filter(|time| !time.is_empty() && *time != "false")
    }
}

// Credentials persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub api_key: String,
    pub username: String,
}

impl Session {
    // An empty key is what a cleared store looks like to older clients.
    pub fn is_active(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Attendance flags captured when an invitee list is loaded.
///
/// The snapshot is immutable; it only answers "was this position already
/// attended?" and "does the live list differ from what was loaded?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSnapshot {
    flags: Vec<bool>,
}

impl AttendanceSnapshot {
    pub fn capture(invitees: &[Invitee]) -> Self {
        Self {
            flags: invitees.iter().map(|invitee| invitee.has_attended).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns the loaded flag at `index`, or `None` past the end.
    pub fn was_attended(&self, index: usize) -> Option<bool> {
        self.flags.get(index).copied()
    }

    /// True when any position holds a different flag than at load time.
    pub fn differs_from(&self, invitees: &[Invitee]) -> bool {
        self.flags.len() != invitees.len()
            || self
                .flags
                .iter()
                .zip(invitees)
                .any(|(loaded, invitee)| *loaded != invitee.has_attended)
    }
}

// Server acknowledgement for update and logout calls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ack {
    pub success: bool,
    pub message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// The backend reports an unset time as null, and some deployments as `false`.
fn timestamp_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(time) => Ok(Some(time)),
        Value::Null | Value::Bool(false) => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected attendance time string, null or false, got {other}"
        ))),
    }
}
