use std::fmt;

// Errors surfaced to staff by check-in workflows. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinError {
    // Backend unreachable or the request timed out.
    Network(String),
    // Non-2xx status or a success envelope that could not be read.
    Api {
        status: Option<u16>,
        message: String,
    },
    // Credentials rejected or the login response carried no API key.
    Auth(String),
    // A response parsed but lacked the expected payload.
    Data(String),
    // Invitee JSON could not be read into the domain model.
    Parse(String),
    // The local session file could not be read or written.
    Storage(String),
    InvalidInput(String),
    // An action was requested from a screen that does not offer it.
    Navigation {
        expected: &'static str,
        actual: &'static str,
    },
}

impl fmt::Display for CheckinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckinError::Network(message) => write!(f, "Network Error: {message}"),
            CheckinError::Api {
                status: Some(status),
                message,
            } => write!(f, "API Error {status}: {message}"),
            CheckinError::Api {
                status: None,
                message,
            } => write!(f, "API Error: {message}"),
            CheckinError::Auth(message) => write!(f, "Login failed: {message}"),
            CheckinError::Data(message) => write!(f, "{message}"),
            CheckinError::Parse(message) => write!(f, "Error parsing data: {message}"),
            CheckinError::Storage(message) => write!(f, "Session storage error: {message}"),
            CheckinError::InvalidInput(message) => write!(f, "{message}"),
            CheckinError::Navigation { expected, actual } => {
                write!(f, "not available on the {actual} screen (needs {expected})")
            }
        }
    }
}

impl std::error::Error for CheckinError {}
