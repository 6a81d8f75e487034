//! Undo/redo history of content changes
//!
//! [`History`] applies [`Operation`]s to the local store and keeps two
//! stacks of applied operations:
//! - the undo stack, most recent on top
//! - the redo stack, holding operations undone since the last execute
//!
//! The stacks form one linear history: executing a new undoable operation
//! discards whatever could have been redone.
//!
//! Every call holds the stack lock for its whole duration, including the
//! store writes, so concurrent calls on one `History` run one after another.

mod operation;

pub use operation::{ContentBatch, Operation};

use crate::db::Database;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};

/// Capacity of the history event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notifications emitted by [`History`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// An operation was applied
    Executed {
        /// Label of the operation
        label: String,
        /// Whether it was recorded on the undo stack
        undoable: bool,
    },
    /// An operation was reverted and moved to the redo stack
    Undone {
        /// Label of the operation
        label: String,
    },
    /// An operation was re-applied and moved back to the undo stack
    Redone {
        /// Label of the operation
        label: String,
    },
    /// Both stacks were dropped
    Cleared,
}

#[derive(Default)]
struct Stacks {
    undo: Vec<Operation>,
    redo: Vec<Operation>,
}

/// Undo/redo manager over a shared local store
pub struct History {
    db: Arc<Database>,
    stacks: Mutex<Stacks>,
    event_tx: broadcast::Sender<HistoryEvent>,
}

impl History {
    /// Create an empty history writing to `db`
    pub fn new(db: Arc<Database>) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            db,
            stacks: Mutex::new(Stacks::default()),
            event_tx,
        }
    }

    /// The store operations are applied to
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Subscribe to history change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: HistoryEvent) {
        // No subscribers is fine; the event is dropped
        self.event_tx.send(event).ok();
    }

    /// Apply `op`, recording it for undo when `undoable` is set
    ///
    /// An undoable operation clears the redo stack. A non-undoable one
    /// leaves both stacks as they were.
    ///
    /// # Errors
    /// Propagates the failure of [`Operation::apply`]; nothing is recorded
    /// in that case
    pub async fn execute(&self, op: Operation, undoable: bool) -> Result<()> {
        let mut stacks = self.stacks.lock().await;

        let label = op.label();
        op.apply(&self.db).await?;

        if undoable {
            stacks.undo.push(op);
            stacks.redo.clear();
        }

        tracing::info!(
            operation = %label,
            undoable,
            undo_depth = stacks.undo.len(),
            "Executed operation"
        );
        self.emit_event(HistoryEvent::Executed { label, undoable });
        Ok(())
    }

    /// Revert the most recent operation
    ///
    /// Returns the label of the reverted operation, or `None` when there is
    /// nothing to undo.
    ///
    /// # Errors
    /// Propagates the failure of [`Operation::revert`]; the operation stays on
    /// the undo stack in that case
    pub async fn undo(&self) -> Result<Option<String>> {
        let mut stacks = self.stacks.lock().await;

        let Some(op) = stacks.undo.pop() else {
            return Ok(None);
        };
        let label = op.label();

        if let Err(e) = op.revert(&self.db).await {
            tracing::error!(operation = %label, error = %e, "Undo failed");
            stacks.undo.push(op);
            return Err(e);
        }

        stacks.redo.push(op);
        tracing::info!(operation = %label, redo_depth = stacks.redo.len(), "Undid operation");
        self.emit_event(HistoryEvent::Undone {
            label: label.clone(),
        });
        Ok(Some(label))
    }

    /// Re-apply the most recently undone operation
    ///
    /// Returns the label of the re-applied operation, or `None` when there is
    /// nothing to redo.
    ///
    /// # Errors
    /// Propagates the failure of [`Operation::apply`]; the operation stays on
    /// the redo stack in that case
    pub async fn redo(&self) -> Result<Option<String>> {
        let mut stacks = self.stacks.lock().await;

        let Some(op) = stacks.redo.pop() else {
            return Ok(None);
        };
        let label = op.label();

        if let Err(e) = op.apply(&self.db).await {
            tracing::error!(operation = %label, error = %e, "Redo failed");
            stacks.redo.push(op);
            return Err(e);
        }

        stacks.undo.push(op);
        tracing::info!(operation = %label, undo_depth = stacks.undo.len(), "Redid operation");
        self.emit_event(HistoryEvent::Redone {
            label: label.clone(),
        });
        Ok(Some(label))
    }

    /// Whether there is an operation to undo
    pub async fn can_undo(&self) -> bool {
        !self.stacks.lock().await.undo.is_empty()
    }

    /// Whether there is an operation to redo
    pub async fn can_redo(&self) -> bool {
        !self.stacks.lock().await.redo.is_empty()
    }

    /// Number of operations on the undo stack
    pub async fn undo_depth(&self) -> usize {
        self.stacks.lock().await.undo.len()
    }

    /// Number of operations on the redo stack
    pub async fn redo_depth(&self) -> usize {
        self.stacks.lock().await.redo.len()
    }

    /// Snapshot of the undo stack, bottom to top
    pub async fn undo_stack(&self) -> Vec<Operation> {
        self.stacks.lock().await.undo.clone()
    }

    /// Snapshot of the redo stack, bottom to top
    pub async fn redo_stack(&self) -> Vec<Operation> {
        self.stacks.lock().await.redo.clone()
    }

    /// Drop both stacks without touching the store
    pub async fn clear(&self) {
        let mut stacks = self.stacks.lock().await;
        stacks.undo.clear();
        stacks.redo.clear();
        tracing::debug!("Cleared history");
        self.emit_event(HistoryEvent::Cleared);
    }
}
