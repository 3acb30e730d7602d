// In-process fake of the tickets backend for integration tests.
#![allow(dead_code)]
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::post,
};
use checkin_client::interface_adapters::scanner::SharedLines;
use checkin_client::interface_adapters::session_file::FileSessionStore;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub const STAFF_USER: &str = "staff";
pub const STAFF_PASSWORD: &str = "secret";
pub const API_KEY: &str = "key-abc";
// Username that logs in successfully but gets no API key back.
pub const KEYLESS_USER: &str = "keyless";
// Code whose response omits the `message` payload.
pub const NO_PAYLOAD_CODE: &str = "NO-PAYLOAD";

// Everything the fake backend saw, plus switches for failure paths.
pub struct BackendState {
    invitees: HashMap<String, Vec<Value>>,
    pub logins: Mutex<Vec<Value>>,
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub updates: Mutex<Vec<Value>>,
    pub revoked: Mutex<Vec<String>>,
    pub fail_updates: AtomicBool,
}

impl BackendState {
    fn seeded() -> Self {
        let mut invitees = HashMap::new();
        invitees.insert(
            "QR-100".to_string(),
            vec![
                json!({
                    "main_invitee": false,
                    "number_of_seats": 3,
                    "invitees_qrcode_text": "QR-100",
                    "invitees_name": "Mona",
                    "invitees_attendance": false,
                    "invitees_attendance_time": null
                }),
                json!({
                    "main_invitee": false,
                    "number_of_seats": 3,
                    "invitees_qrcode_text": "QR-100",
                    "invitees_name": "Omar",
                    "invitees_attendance": true,
                    "invitees_attendance_time": "2025-05-01 10:00:00"
                }),
            ],
        );
        invitees.insert(
            "QR-NULLS".to_string(),
            vec![json!({
                "main_invitee": false,
                "number_of_seats": null,
                "invitees_qrcode_text": "QR-NULLS",
                "invitees_name": "Laila",
                "invitees_attendance": false,
                "invitees_attendance_time": false
            })],
        );

        Self {
            invitees,
            logins: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
            fail_updates: AtomicBool::new(false),
        }
    }

    pub fn last_auth_header(&self) -> Option<String> {
        self.auth_headers
            .lock()
            .expect("auth headers mutex poisoned")
            .last()
            .cloned()
            .flatten()
    }
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

// Records the Authorization header and checks the bearer key.
fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<(), Reply> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .auth_headers
        .lock()
        .expect("auth headers mutex poisoned")
        .push(header.clone());

    match header.as_deref().and_then(|value| value.strip_prefix("Bearer ")) {
        None => Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "API key is required" }),
        )),
        Some(key) if key != API_KEY => Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Invalid or expired API key" }),
        )),
        Some(_) => Ok(()),
    }
}

fn str_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Reply {
    state
        .logins
        .lock()
        .expect("logins mutex poisoned")
        .push(body.clone());

    let (db, user, password) = (
        str_field(&body, "db"),
        str_field(&body, "login"),
        str_field(&body, "password"),
    );
    if db.is_empty() || user.is_empty() || password.is_empty() {
        return reply(
            StatusCode::FORBIDDEN,
            json!({ "missing error": "either of the following are missing [db, username,password]" }),
        );
    }

    if user == KEYLESS_USER {
        return reply(
            StatusCode::CREATED,
            json!({ "message": [{}], "success": true }),
        );
    }
    if user != STAFF_USER || password != STAFF_PASSWORD {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({ "Access denied": "Login, password or db invalid" }),
        );
    }

    reply(
        StatusCode::CREATED,
        json!({ "message": [{ "apikey": API_KEY }], "success": true }),
    )
}

async fn get_data(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let Some(code) = body.get("invitees_qrcode_text").and_then(Value::as_str) else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": "invitees_qrcode_text is required" }),
        );
    };
    if code == NO_PAYLOAD_CODE {
        return reply(StatusCode::OK, json!({ "success": true }));
    }

    let rows = state.invitees.get(code).cloned().unwrap_or_default();
    reply(StatusCode::OK, json!({ "message": rows, "success": true }))
}

async fn update_data(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    if state.fail_updates.load(Ordering::SeqCst) {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error" }),
        );
    }
    let Some(invitees) = body.get("invitees").filter(|value| value.is_array()) else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({ "error": "invitees array is required" }),
        );
    };

    state
        .updates
        .lock()
        .expect("updates mutex poisoned")
        .push(invitees.clone());
    reply(
        StatusCode::OK,
        json!({ "message": "Successfully updated invitee's attendance", "success": true }),
    )
}

async fn logout(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Reply {
    let api_key = body.get("api_key").and_then(Value::as_str).unwrap_or_default();
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    if api_key.is_empty() || username.is_empty() {
        return reply(
            StatusCode::FORBIDDEN,
            json!({ "missing error": "either of the following are missing [api_key, username]" }),
        );
    }
    if api_key != API_KEY {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Invalid or expired API key" }),
        );
    }

    state
        .revoked
        .lock()
        .expect("revoked mutex poisoned")
        .push(api_key.to_string());
    reply(
        StatusCode::CREATED,
        json!({ "message": "API KEY Successfully Removed", "success": true }),
    )
}

// Start a fake backend on an ephemeral port for the current test runtime.
pub async fn spawn_backend() -> FakeBackend {
    let state = Arc::new(BackendState::seeded());
    let app = Router::new()
        .route("/api/v1/tickets/login", post(login))
        .route("/api/v1/tickets/get_data", post(get_data))
        .route("/api/v1/tickets/update_data", post(update_data))
        .route("/api/v1/tickets/logout", post(logout))
        .with_state(Arc::clone(&state));

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend failed");
    });

    FakeBackend {
        base_url: format!("http://{addr}/api/v1/"),
        state,
    }
}

// Session store in a fresh temp directory.
pub fn temp_session_store() -> FileSessionStore {
    let dir = std::env::temp_dir().join(format!("checkin-it-{}", uuid::Uuid::new_v4()));
    FileSessionStore::new(dir, "login_prefs")
}

// Input lines fed to the console and scanner; the channel closes after the last line.
pub fn scripted_lines(lines: &[&str]) -> SharedLines {
    let (tx, rx) = mpsc::channel(lines.len().max(1));
    for line in lines {
        tx.try_send(line.to_string()).expect("channel has room");
    }
    Arc::new(tokio::sync::Mutex::new(rx))
}
