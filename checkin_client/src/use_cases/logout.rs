use crate::domain::{CheckinError, SessionStore, TicketsApi};

// How the remote side of a logout went; the local session is gone in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    // The backend revoked the API key.
    Remote,
    // The remote call failed; only the local session was cleared.
    Offline,
    // Nothing usable was stored, so no remote call was made.
    NoSession,
}

// Logout use case with injected dependencies.
pub struct LogoutUseCase<'a> {
    pub api: &'a dyn TicketsApi,
    pub sessions: &'a dyn SessionStore,
}

impl LogoutUseCase<'_> {
    pub async fn execute(&self) -> Result<LogoutOutcome, CheckinError> {
        let stored = self.sessions.load().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to read session before logout.");
            None
        });

        let outcome = match stored.filter(|s| !s.api_key.is_empty() && !s.username.is_empty()) {
            Some(session) => match self.api.logout(&session.api_key, &session.username).await {
                Ok(_) => LogoutOutcome::Remote,
                Err(err) => {
                    tracing::warn!(error = %err, "remote logout failed; clearing local session.");
                    LogoutOutcome::Offline
                }
            },
            None => LogoutOutcome::NoSession,
        };

        self.sessions
            .clear()
            .await
            .map_err(CheckinError::Storage)?;

        Ok(outcome)
    }
}
