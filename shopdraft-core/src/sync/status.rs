//! Hooks the presentation layer provides to remote operations.

use super::gate::Operation;

/// Progress of a remote operation as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    /// The request is running; the triggering control is disabled.
    InProgress { operation: Operation, message: String },
    Success { operation: Operation, message: String },
    Failure { operation: Operation, message: String },
    /// The user declined the confirmation.
    Cancelled { operation: Operation },
}

impl SyncStatus {
    pub fn operation(&self) -> Operation {
        match self {
            SyncStatus::InProgress { operation, .. }
            | SyncStatus::Success { operation, .. }
            | SyncStatus::Failure { operation, .. }
            | SyncStatus::Cancelled { operation } => *operation,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SyncStatus::InProgress { message, .. }
            | SyncStatus::Success { message, .. }
            | SyncStatus::Failure { message, .. } => Some(message),
            SyncStatus::Cancelled { .. } => None,
        }
    }

    /// Whether the triggering control accepts input after this status.
    pub fn control_enabled(&self) -> bool {
        !matches!(self, SyncStatus::InProgress { .. })
    }
}

/// Receives status updates from remote operations.
pub trait StatusSink {
    fn report(&mut self, status: SyncStatus);
}

impl StatusSink for Vec<SyncStatus> {
    fn report(&mut self, status: SyncStatus) {
        self.push(status);
    }
}

/// Yes/no gate shown before a destructive cross-boundary operation.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
