use async_trait::async_trait;

use crate::domain::entities::{Ack, Invitee, Session};
use crate::domain::errors::CheckinError;

// Port for the remote tickets backend.
// Screens depend on this trait, not on the reqwest client.
#[async_trait]
pub trait TicketsApi: Send + Sync {
    // Returns the API key issued for the staff user.
    async fn login(
        &self,
        username: &str,
        password: &str,
        db_name: &str,
    ) -> Result<String, CheckinError>;

    async fn fetch_invitees(&self, code: &str) -> Result<Vec<Invitee>, CheckinError>;

    async fn update_invitees(&self, invitees: &[Invitee]) -> Result<Ack, CheckinError>;

    async fn logout(&self, api_key: &str, username: &str) -> Result<Ack, CheckinError>;
}

// Port for the single persisted session of this installation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, String>;
    async fn save(&self, session: &Session) -> Result<(), String>;
    // Returns true when a stored session was removed.
    async fn clear(&self) -> Result<bool, String>;
}

// Port for the QR scanner.
#[async_trait]
pub trait CodeScanner: Send + Sync {
    async fn request_permission(&self) -> bool;
    // Runs one scan session. `None` means the session ended without a code.
    async fn scan(&self) -> Result<Option<String>, String>;
}
