//! Explicit synchronization between the local draft and the remote document.
//!
//! ## Model
//!
//! - The remote document is the published product list, a flat JSON array.
//! - The draft is the local, possibly unpublished copy.
//! - `pull` overwrites the draft with the remote list.
//! - `push` overwrites the remote list with the normalized draft.
//!
//! Both run only on request, behind a confirmation, one at a time per
//! direction. Failures are reported through a [`StatusSink`] and leave the
//! local draft as it was.

mod error;
mod gate;
mod remote;
mod session;
mod status;

pub use error::SyncError;
pub use gate::{GateState, Operation, OperationGate};
pub use remote::{HttpRemote, RemoteStore};
pub use session::{RemoteSync, SyncOutcome, PULL_PROMPT, PUSH_PROMPT};
pub use status::{Confirm, StatusSink, SyncStatus};
