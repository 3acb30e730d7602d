use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{Ack, CheckinError, CodeScanner, Invitee, Session, SessionStore, TicketsApi};

pub(crate) fn invitee(name: &str, has_attended: bool) -> Invitee {
    Invitee {
        is_main_invitee: false,
        seat_count: 3,
        qr_code_text: "QR-1".to_string(),
        name: name.to_string(),
        has_attended,
        attendance_timestamp: has_attended.then(|| "2025-05-01 10:00:00".to_string()),
    }
}

pub(crate) fn session(api_key: &str, username: &str) -> Session {
    Session {
        api_key: api_key.to_string(),
        username: username.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    Login {
        username: String,
        password: String,
        db_name: String,
    },
    Fetch(String),
    Update(Vec<Invitee>),
    Logout {
        api_key: String,
        username: String,
    },
}

// Scripted backend that records every call it receives.
#[derive(Clone)]
pub(crate) struct FakeTicketsApi {
    login: Result<String, CheckinError>,
    fetch: Result<Vec<Invitee>, CheckinError>,
    update: Result<Ack, CheckinError>,
    logout: Result<Ack, CheckinError>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl FakeTicketsApi {
    pub(crate) fn new() -> Self {
        let ok = Ack {
            success: true,
            message: None,
        };
        Self {
            login: Ok("key-1".to_string()),
            fetch: Ok(vec![invitee("A", false), invitee("B", true)]),
            update: Ok(ok.clone()),
            logout: Ok(ok),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_login(mut self, result: Result<String, CheckinError>) -> Self {
        self.login = result;
        self
    }

    pub(crate) fn with_fetch(mut self, result: Result<Vec<Invitee>, CheckinError>) -> Self {
        self.fetch = result;
        self
    }

    pub(crate) fn with_update(mut self, result: Result<Ack, CheckinError>) -> Self {
        self.update = result;
        self
    }

    pub(crate) fn with_logout(mut self, result: Result<Ack, CheckinError>) -> Self {
        self.logout = result;
        self
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl TicketsApi for FakeTicketsApi {
    async fn login(
        &self,
        username: &str,
        password: &str,
        db_name: &str,
    ) -> Result<String, CheckinError> {
        self.record(ApiCall::Login {
            username: username.to_string(),
            password: password.to_string(),
            db_name: db_name.to_string(),
        });
        self.login.clone()
    }

    async fn fetch_invitees(&self, code: &str) -> Result<Vec<Invitee>, CheckinError> {
        self.record(ApiCall::Fetch(code.to_string()));
        self.fetch.clone()
    }

    async fn update_invitees(&self, invitees: &[Invitee]) -> Result<Ack, CheckinError> {
        self.record(ApiCall::Update(invitees.to_vec()));
        self.update.clone()
    }

    async fn logout(&self, api_key: &str, username: &str) -> Result<Ack, CheckinError> {
        self.record(ApiCall::Logout {
            api_key: api_key.to_string(),
            username: username.to_string(),
        });
        self.logout.clone()
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub load: bool,
    pub save: bool,
    pub clear: bool,
}

// In-memory session store with switchable failures.
#[derive(Clone)]
pub(crate) struct RecordingSessionStore {
    session: Arc<Mutex<Option<Session>>>,
    failures: FailureFlags,
}

impl RecordingSessionStore {
    pub(crate) fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_session(self, session: Session) -> Self {
        *self.session.lock().expect("session mutex poisoned") = Some(session);
        self
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn stored(&self) -> Option<Session> {
        self.session.lock().expect("session mutex poisoned").clone()
    }
}

#[async_trait]
impl SessionStore for RecordingSessionStore {
    async fn load(&self) -> Result<Option<Session>, String> {
        if self.failures.load {
            return Err("load failed".to_string());
        }
        Ok(self.stored())
    }

    async fn save(&self, session: &Session) -> Result<(), String> {
        if self.failures.save {
            return Err("save failed".to_string());
        }
        *self.session.lock().expect("session mutex poisoned") = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<bool, String> {
        if self.failures.clear {
            return Err("clear failed".to_string());
        }
        Ok(self
            .session
            .lock()
            .expect("session mutex poisoned")
            .take()
            .is_some())
    }
}

// Scanner that replays queued scan results.
#[derive(Clone)]
pub(crate) struct ScriptedScanner {
    permitted: bool,
    results: Arc<Mutex<VecDeque<Option<String>>>>,
}

impl ScriptedScanner {
    pub(crate) fn new(results: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            permitted: true,
            results: Arc::new(Mutex::new(results.into_iter().collect())),
        }
    }

    pub(crate) fn denied() -> Self {
        Self {
            permitted: false,
            results: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

#[async_trait]
impl CodeScanner for ScriptedScanner {
    async fn request_permission(&self) -> bool {
        self.permitted
    }

    async fn scan(&self) -> Result<Option<String>, String> {
        Ok(self
            .results
            .lock()
            .expect("results mutex poisoned")
            .pop_front()
            .flatten())
    }
}
