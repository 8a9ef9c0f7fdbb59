//! Client-side state of the admin score workflow.

use indexmap::IndexMap;

use crate::dto::competition::ManageDetail;

/// Adjustment accumulated for one team before it is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingAdjustment {
    /// Signed delta built from +1/-1 steps.
    pub delta: i64,
    /// Free-text reason, sent as-is.
    pub reason: String,
}

/// Competition opened through its manage identifier.
#[derive(Debug, Clone)]
pub struct ManageSession {
    /// Manage identifier the session was opened with.
    pub manage_id: String,
    /// Last detail fetched from the backend.
    pub detail: ManageDetail,
    pending: IndexMap<String, PendingAdjustment>,
}

impl ManageSession {
    /// Start a session with a fresh pending entry for every team.
    pub fn new(manage_id: String, detail: ManageDetail) -> Self {
        let mut session = Self {
            manage_id,
            detail,
            pending: IndexMap::new(),
        };
        session.reset_pending();
        session
    }

    /// Replace the detail after a refetch; every pending entry starts over.
    pub fn replace_detail(&mut self, detail: ManageDetail) {
        self.detail = detail;
        self.reset_pending();
    }

    /// Add one to the team's pending delta.
    pub fn increment(&mut self, team_id: &str) -> Option<&PendingAdjustment> {
        self.step(team_id, 1)
    }

    /// Subtract one from the team's pending delta.
    pub fn decrement(&mut self, team_id: &str) -> Option<&PendingAdjustment> {
        self.step(team_id, -1)
    }

    /// Overwrite the team's pending reason.
    pub fn set_reason(&mut self, team_id: &str, reason: String) -> Option<&PendingAdjustment> {
        let entry = self.pending.get_mut(team_id)?;
        entry.reason = reason;
        Some(entry)
    }

    /// Clear only the reason of a team.
    pub fn clear_reason(&mut self, team_id: &str) {
        if let Some(entry) = self.pending.get_mut(team_id) {
            entry.reason.clear();
        }
    }

    /// Start the team's pending entry over, leaving the other teams alone.
    pub fn reset_team(&mut self, team_id: &str) {
        if let Some(entry) = self.pending.get_mut(team_id) {
            *entry = PendingAdjustment::default();
        }
    }

    /// Pending adjustment of a team.
    pub fn pending(&self, team_id: &str) -> Option<&PendingAdjustment> {
        self.pending.get(team_id)
    }

    fn step(&mut self, team_id: &str, by: i64) -> Option<&PendingAdjustment> {
        let entry = self.pending.get_mut(team_id)?;
        entry.delta = entry.delta.saturating_add(by);
        Some(entry)
    }

    fn reset_pending(&mut self) {
        self.pending = self
            .detail
            .teams
            .iter()
            .map(|team| (team.team_id.clone(), PendingAdjustment::default()))
            .collect();
    }
}
