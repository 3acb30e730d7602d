// Attendance screen controller: owns the invitee list for one scanned ticket.

use crate::domain::{Ack, AttendanceSnapshot, CheckinError, Invitee, TicketsApi};

/// Lifecycle of one attendance screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    /// Flags match the snapshot; submit is disabled.
    Loaded,
    /// At least one flag differs from the snapshot; submit is enabled.
    Dirty,
    /// An update call is in flight; toggles and submit are disabled.
    Submitting,
    /// The update was accepted; the screen is done.
    Closed,
}

/// Reasons a toggle is ignored. The list is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRejected {
    AlreadyAttended,
    OutOfRange,
    Busy,
}

#[derive(Debug, Clone)]
pub struct AttendanceScreen {
    invitees: Vec<Invitee>,
    snapshot: AttendanceSnapshot,
    state: AttendanceState,
}

impl AttendanceScreen {
    pub fn load(invitees: Vec<Invitee>) -> Self {
        let snapshot = AttendanceSnapshot::capture(&invitees);
        Self {
            invitees,
            snapshot,
            state: AttendanceState::Loaded,
        }
    }

    /// Builds a screen from a JSON array of invitees.
    pub fn load_from_json(payload: &str) -> Result<Self, CheckinError> {
        let invitees: Vec<Invitee> =
            serde_json::from_str(payload).map_err(|err| CheckinError::Parse(err.to_string()))?;
        Ok(Self::load(invitees))
    }

    pub fn invitees(&self) -> &[Invitee] {
        &self.invitees
    }

    pub fn state(&self) -> AttendanceState {
        self.state
    }

    pub fn can_submit(&self) -> bool {
        self.state == AttendanceState::Dirty
    }

    /// Invitees already attended at load time can never be changed.
    pub fn is_locked(&self, index: usize) -> bool {
        self.snapshot.was_attended(index).unwrap_or(false)
    }

    /// Card data for the ticket as a whole: the flagged main invitee, else the first row.
    pub fn ticket_summary(&self) -> Option<&Invitee> {
        self.invitees
            .iter()
            .find(|invitee| invitee.is_main_invitee)
            .or_else(|| self.invitees.first())
    }

    pub fn toggle(&mut self, index: usize) -> Result<AttendanceState, ToggleRejected> {
        let current = self
            .invitees
            .get(index)
            .ok_or(ToggleRejected::OutOfRange)?
            .has_attended;
        self.set_attended(index, !current)
    }

    pub fn set_attended(
        &mut self,
        index: usize,
        attended: bool,
    ) -> Result<AttendanceState, ToggleRejected> {
        if matches!(
            self.state,
            AttendanceState::Submitting | AttendanceState::Closed
        ) {
            return Err(ToggleRejected::Busy);
        }
        match self.snapshot.was_attended(index) {
            None => return Err(ToggleRejected::OutOfRange),
            Some(true) => return Err(ToggleRejected::AlreadyAttended),
            Some(false) => {}
        }

        self.invitees[index].has_attended = attended;
        self.state = self.compare_with_snapshot();
        Ok(self.state)
    }

    /// Moves a dirty screen to `Submitting` and returns the list to send.
    pub fn begin_submit(&mut self) -> Option<Vec<Invitee>> {
        if self.state != AttendanceState::Dirty {
            return None;
        }
        self.state = AttendanceState::Submitting;
        Some(self.invitees.clone())
    }

    /// Applies the outcome of the update call and hands it back to the caller.
    pub fn finish_submit(&mut self, result: Result<Ack, CheckinError>) -> Result<Ack, CheckinError> {
        if self.state != AttendanceState::Submitting {
            return result;
        }
        self.state = match &result {
            Ok(_) => AttendanceState::Closed,
            Err(_) => self.compare_with_snapshot(),
        };
        result
    }

    pub async fn submit(&mut self, api: &dyn TicketsApi) -> Result<Ack, CheckinError> {
        let invitees = self.begin_submit().ok_or_else(|| {
            CheckinError::InvalidInput("no attendance changes to submit".to_string())
        })?;

        let result = api.update_invitees(&invitees).await;
        match &result {
            Ok(_) => tracing::info!(count = invitees.len(), "attendance submitted."),
            Err(err) => tracing::warn!(error = %err, "attendance submit failed."),
        }
        self.finish_submit(result)
    }

    fn compare_with_snapshot(&self) -> AttendanceState {
        if self.snapshot.differs_from(&self.invitees) {
            AttendanceState::Dirty
        } else {
            AttendanceState::Loaded
        }
    }
}
