pub mod entities;
pub mod errors;
pub mod ports;

// Re-export the domain boundary types and ports.
pub use entities::{Ack, AttendanceSnapshot, Invitee, Session};
pub use errors::CheckinError;
pub use ports::{CodeScanner, SessionStore, TicketsApi};
