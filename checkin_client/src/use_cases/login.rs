use crate::domain::{CheckinError, Session, SessionStore, TicketsApi};

// Login use case with injected dependencies.
pub struct LoginUseCase<'a> {
    pub api: &'a dyn TicketsApi,
    pub sessions: &'a dyn SessionStore,
    pub db_name: &'a str,
}

impl LoginUseCase<'_> {
    pub async fn execute(&self, username: &str, password: &str) -> Result<Session, CheckinError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(CheckinError::InvalidInput(
                "Please enter username and password".to_string(),
            ));
        }

        let api_key = self.api.login(username, password, self.db_name).await?;

        // Persist only after the backend issued a key.
        let session = Session {
            api_key,
            username: username.to_string(),
        };
        self.sessions
            .save(&session)
            .await
            .map_err(CheckinError::Storage)?;

        Ok(session)
    }
}
