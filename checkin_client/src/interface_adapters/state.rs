use crate::domain::{CodeScanner, SessionStore, TicketsApi};
use std::sync::Arc;

// Dependencies handed to the navigation shell at startup.
#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub api: Arc<dyn TicketsApi>,
    pub sessions: Arc<dyn SessionStore>,
    pub scanner: Arc<dyn CodeScanner>,
    // Backend database name sent with every login.
    pub db_name: String,
}
