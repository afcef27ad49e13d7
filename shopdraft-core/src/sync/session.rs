//! Explicit pull/push between the local draft and the remote document.
//!
//! Both directions are full-document overwrites: a pull replaces the draft
//! with the remote list, a push replaces the remote list with the draft.
//! Nothing is merged and nothing runs automatically.

use super::error::SyncError;
use super::gate::{Operation, OperationGate};
use super::remote::RemoteStore;
use super::status::{Confirm, StatusSink, SyncStatus};
use crate::draft::{DraftCache, DraftStore};

pub const PULL_PROMPT: &str = "Load products from the store? This will overwrite your local draft.";
pub const PUSH_PROMPT: &str =
    "Publish changes to the store? This will replace the current products.";

/// How a remote operation ended.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The user declined the confirmation; nothing was touched.
    Cancelled,
    /// The draft now holds `products` records, identical to the remote.
    Completed { products: usize },
    /// The operation failed and was reported; local state is unchanged.
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SyncOutcome::Completed { .. })
    }
}

/// Owns the draft and the remote, and runs pull/push between them.
#[derive(Debug)]
pub struct RemoteSync<C, R> {
    draft: DraftStore<C>,
    remote: R,
    pull_gate: OperationGate,
    push_gate: OperationGate,
}

impl<C: DraftCache, R: RemoteStore> RemoteSync<C, R> {
    pub fn new(draft: DraftStore<C>, remote: R) -> Self {
        Self {
            draft,
            remote,
            pull_gate: OperationGate::new(Operation::Pull),
            push_gate: OperationGate::new(Operation::Push),
        }
    }

    pub fn draft(&self) -> &DraftStore<C> {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DraftStore<C> {
        &mut self.draft
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn gate(&self, operation: Operation) -> &OperationGate {
        match operation {
            Operation::Pull => &self.pull_gate,
            Operation::Push => &self.push_gate,
        }
    }

    pub fn into_draft(self) -> DraftStore<C> {
        self.draft
    }

    /// Replaces the draft with the remote document.
    ///
    /// Returns `Err` only when a pull is already running.
    pub async fn pull(
        &mut self,
        confirm: &mut impl Confirm,
        sink: &mut impl StatusSink,
    ) -> Result<SyncOutcome, SyncError> {
        self.pull_gate.begin()?;
        if !confirm.confirm(PULL_PROMPT) {
            self.pull_gate.decline();
            sink.report(SyncStatus::Cancelled {
                operation: Operation::Pull,
            });
            return Ok(SyncOutcome::Cancelled);
        }

        self.pull_gate.launch();
        sink.report(SyncStatus::InProgress {
            operation: Operation::Pull,
            message: "Loading products from the store...".to_string(),
        });

        let result = match self.remote.fetch().await {
            Ok(values) => {
                let products = self.draft.normalizer().normalize_values(values);
                self.draft.replace_all(products).map_err(SyncError::from)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                let count = self.draft.len();
                tracing::info!(count, "Pulled products from remote");
                self.pull_gate.finish(true);
                sink.report(SyncStatus::Success {
                    operation: Operation::Pull,
                    message: format!("Loaded {} product(s) and saved them as the local draft.", count),
                });
                Ok(SyncOutcome::Completed { products: count })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Pull failed");
                self.pull_gate.finish(false);
                sink.report(SyncStatus::Failure {
                    operation: Operation::Pull,
                    message: format!("Could not load products: {}", e),
                });
                Ok(SyncOutcome::Failed(e))
            }
        }
    }

    /// Replaces the remote document with the normalized draft.
    ///
    /// Returns `Err` only when a push is already running.
    pub async fn push(
        &mut self,
        confirm: &mut impl Confirm,
        sink: &mut impl StatusSink,
    ) -> Result<SyncOutcome, SyncError> {
        self.push_gate.begin()?;
        if !confirm.confirm(PUSH_PROMPT) {
            self.push_gate.decline();
            sink.report(SyncStatus::Cancelled {
                operation: Operation::Push,
            });
            return Ok(SyncOutcome::Cancelled);
        }

        self.push_gate.launch();
        sink.report(SyncStatus::InProgress {
            operation: Operation::Push,
            message: "Publishing to the store...".to_string(),
        });

        let normalized = self
            .draft
            .normalizer()
            .normalize_all(self.draft.products().to_vec());

        let result = match self.remote.replace(&normalized).await {
            Ok(_) => self.draft.replace_all(normalized).map_err(SyncError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                let count = self.draft.len();
                tracing::info!(count, "Published products to remote");
                self.push_gate.finish(true);
                sink.report(SyncStatus::Success {
                    operation: Operation::Push,
                    message: format!("Published {} product(s) to the store.", count),
                });
                Ok(SyncOutcome::Completed { products: count })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Push failed");
                self.push_gate.finish(false);
                sink.report(SyncStatus::Failure {
                    operation: Operation::Push,
                    message: format!("Could not publish: {}", e),
                });
                Ok(SyncOutcome::Failed(e))
            }
        }
    }
}
