// Use cases: check-in workflows built on the domain ports.

pub mod attendance;
pub mod login;
pub mod logout;
pub mod navigation;

#[cfg(test)]
pub(crate) mod test_support;

pub use attendance::{AttendanceScreen, AttendanceState, ToggleRejected};
pub use logout::LogoutOutcome;
pub use navigation::{ScanOutcome, Screen, Shell};
