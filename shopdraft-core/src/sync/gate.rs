//! Per-operation state machine guarding remote calls.
//!
//! ```text
//! Idle -> Confirming -> InFlight -> Succeeded | Failed -> Idle
//!              \-> Idle (declined)
//! ```
//!
//! While a gate is not `Idle` its triggering control is disabled and a second
//! invocation is refused. There is no abort path: a request that never
//! completes keeps its gate `InFlight`.

use std::fmt;

use super::error::SyncError;

/// The two remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Pull,
    Push,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Pull => write!(f, "pull"),
            Operation::Push => write!(f, "push"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    Confirming,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct OperationGate {
    operation: Operation,
    state: GateState,
}

impl OperationGate {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            state: GateState::Idle,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Whether the control that triggers this operation accepts input.
    pub fn is_enabled(&self) -> bool {
        self.state == GateState::Idle
    }

    pub(crate) fn begin(&mut self) -> Result<(), SyncError> {
        if !self.is_enabled() {
            return Err(SyncError::AlreadyInFlight(self.operation));
        }
        self.transition(GateState::Confirming);
        Ok(())
    }

    pub(crate) fn decline(&mut self) {
        self.transition(GateState::Idle);
    }

    pub(crate) fn launch(&mut self) {
        self.transition(GateState::InFlight);
    }

    pub(crate) fn finish(&mut self, succeeded: bool) {
        self.transition(if succeeded {
            GateState::Succeeded
        } else {
            GateState::Failed
        });
        self.transition(GateState::Idle);
    }

    fn transition(&mut self, to: GateState) {
        tracing::debug!(operation = %self.operation, from = ?self.state, to = ?to, "Gate transition");
        self.state = to;
    }
}
