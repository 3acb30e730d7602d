// Navigation shell: the fixed screen sequence of the check-in client.
//
// Splash -> Login | Main, Login -> Main, Main -> Attendance | Login,
// Attendance -> Main. Every operation checks the current screen first.

use crate::domain::{Ack, CheckinError};
use crate::interface_adapters::state::AppState;
use crate::use_cases::attendance::{AttendanceScreen, AttendanceState};
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::logout::{LogoutOutcome, LogoutUseCase};

#[derive(Debug)]
pub enum Screen {
    Splash,
    Login,
    Main,
    Attendance(AttendanceScreen),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Splash => "splash",
            Screen::Login => "login",
            Screen::Main => "main",
            Screen::Attendance(_) => "attendance",
        }
    }
}

/// Result of a scan started from the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Invitees were fetched and the attendance screen is open.
    Opened { invitees: usize },
    PermissionDenied,
    Cancelled,
}

pub struct Shell {
    state: AppState,
    screen: Screen,
}

impl Shell {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            screen: Screen::Splash,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn attendance_mut(&mut self) -> Option<&mut AttendanceScreen> {
        match &mut self.screen {
            Screen::Attendance(screen) => Some(screen),
            _ => None,
        }
    }

    fn expect_screen(&self, expected: &'static str) -> Result<(), CheckinError> {
        if self.screen.name() == expected {
            Ok(())
        } else {
            Err(CheckinError::Navigation {
                expected,
                actual: self.screen.name(),
            })
        }
    }

    /// Routes away from the splash screen based on the stored session.
    pub async fn start(&mut self) -> Result<(), CheckinError> {
        self.expect_screen("splash")?;

        let has_session = match self.state.sessions.load().await {
            Ok(session) => session.is_some_and(|session| session.is_active()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored session.");
                false
            }
        };

        self.screen = if has_session {
            Screen::Main
        } else {
            Screen::Login
        };
        tracing::info!(screen = self.screen.name(), "startup routed.");
        Ok(())
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), CheckinError> {
        self.expect_screen("login")?;

        let use_case = LoginUseCase {
            api: self.state.api.as_ref(),
            sessions: self.state.sessions.as_ref(),
            db_name: &self.state.db_name,
        };
        let session = use_case.execute(username, password).await?;

        tracing::info!(username = %session.username, "staff logged in.");
        self.screen = Screen::Main;
        Ok(())
    }

    /// Runs one scan session and opens the attendance screen for the decoded ticket.
    pub async fn scan(&mut self) -> Result<ScanOutcome, CheckinError> {
        self.expect_screen("main")?;

        if !self.state.scanner.request_permission().await {
            tracing::warn!("scanner permission denied.");
            return Ok(ScanOutcome::PermissionDenied);
        }

        let code = match self.state.scanner.scan().await {
            Ok(Some(code)) => code,
            Ok(None) => return Ok(ScanOutcome::Cancelled),
            Err(err) => {
                tracing::error!(error = %err, "scan session failed.");
                return Ok(ScanOutcome::Cancelled);
            }
        };

        let invitees = self.state.api.fetch_invitees(&code).await?;
        let count = invitees.len();
        self.screen = Screen::Attendance(AttendanceScreen::load(invitees));
        Ok(ScanOutcome::Opened { invitees: count })
    }

    /// Submits the open attendance screen; success returns to the main screen.
    pub async fn submit(&mut self) -> Result<Ack, CheckinError> {
        let api = self.state.api.clone();
        let actual = self.screen.name();
        let Screen::Attendance(screen) = &mut self.screen else {
            return Err(CheckinError::Navigation {
                expected: "attendance",
                actual,
            });
        };

        let ack = screen.submit(api.as_ref()).await?;
        if screen.state() == AttendanceState::Closed {
            self.screen = Screen::Main;
        }
        Ok(ack)
    }

    pub fn close_attendance(&mut self) -> Result<(), CheckinError> {
        let submitting = match &self.screen {
            Screen::Attendance(screen) => screen.state() == AttendanceState::Submitting,
            other => {
                return Err(CheckinError::Navigation {
                    expected: "attendance",
                    actual: other.name(),
                });
            }
        };
        if submitting {
            return Err(CheckinError::InvalidInput(
                "attendance is still being submitted".to_string(),
            ));
        }
        self.screen = Screen::Main;
        Ok(())
    }

    /// Logs out; the shell lands on the login screen even if clearing fails.
    pub async fn logout(&mut self) -> Result<LogoutOutcome, CheckinError> {
        self.expect_screen("main")?;

        let use_case = LogoutUseCase {
            api: self.state.api.as_ref(),
            sessions: self.state.sessions.as_ref(),
        };
        let result = use_case.execute().await;
        self.screen = Screen::Login;
        result
    }
}
