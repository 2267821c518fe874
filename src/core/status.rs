//! Machine lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a live machine instance.
///
/// Status moves strictly forward through the lifecycle:
/// `Initialized` → `Idle` (start), `Idle` → `Busy` → `Idle` (fire), and
/// `Idle` or `Busy` → `Terminated` (terminate). `Terminated` is terminal;
/// only queries are accepted afterwards.
///
/// # Example
///
/// ```rust
/// use strata::core::MachineStatus;
///
/// let status = MachineStatus::Initialized;
/// assert!(!status.is_terminated());
/// assert_eq!(status.name(), "Initialized");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MachineStatus {
    /// Created but not yet started
    Initialized,
    /// Started and ready to accept events
    Idle,
    /// Processing an event
    Busy,
    /// Terminated; no further operations accepted
    Terminated,
}

impl MachineStatus {
    /// Get the status name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized => "Initialized",
            Self::Idle => "Idle",
            Self::Busy => "Busy",
            Self::Terminated => "Terminated",
        }
    }

    /// Check if this is the terminal status.
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Check if the machine can process events in this status.
    ///
    /// `Busy` accepts events too: a single-threaded instance can only be
    /// `Busy` when the caller is an action re-entering the machine
    /// synchronously.
    pub fn accepts_events(&self) -> bool {
        matches!(self, Self::Idle | Self::Busy)
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matches_variant() {
        assert_eq!(MachineStatus::Initialized.name(), "Initialized");
        assert_eq!(MachineStatus::Idle.name(), "Idle");
        assert_eq!(MachineStatus::Busy.name(), "Busy");
        assert_eq!(MachineStatus::Terminated.name(), "Terminated");
    }

    #[test]
    fn only_terminated_is_terminal() {
        assert!(MachineStatus::Terminated.is_terminated());
        assert!(!MachineStatus::Initialized.is_terminated());
        assert!(!MachineStatus::Idle.is_terminated());
        assert!(!MachineStatus::Busy.is_terminated());
    }

    #[test]
    fn idle_and_busy_accept_events() {
        assert!(MachineStatus::Idle.accepts_events());
        assert!(MachineStatus::Busy.accepts_events());
        assert!(!MachineStatus::Initialized.accepts_events());
        assert!(!MachineStatus::Terminated.accepts_events());
    }

    #[test]
    fn status_serializes_correctly() {
        let json = serde_json::to_string(&MachineStatus::Idle).unwrap();
        let back: MachineStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MachineStatus::Idle);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(MachineStatus::Busy.to_string(), "Busy");
    }
}
