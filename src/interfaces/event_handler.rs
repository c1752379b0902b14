// ============================================================================
// Event Handler Interface
// Defines the contract for handling document mutation events
// ============================================================================

use crate::domain::DocumentId;
use crate::numeric::NumericValue;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by a collection
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MutationEvent {
    /// Document stored in the collection
    DocumentInserted {
        document_id: DocumentId,
        timestamp: DateTime<Utc>,
    },

    /// Field written by an update operator
    FieldUpdated {
        document_id: DocumentId,
        field: String,
        /// `None` when the field did not exist before
        previous: Option<NumericValue>,
        value: NumericValue,
        /// The stored value is a rounded result
        precision_lost: bool,
        timestamp: DateTime<Utc>,
    },

    /// Update rejected, field left unchanged
    FieldUpdateRejected {
        document_id: DocumentId,
        field: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// All documents removed
    CollectionDropped {
        name: String,
        removed: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing collection events
/// Implementations can handle logging, auditing, replication feeds, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a mutation event
    fn on_event(&self, event: MutationEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<MutationEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: MutationEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: MutationEvent) {
        match &event {
            MutationEvent::FieldUpdated {
                precision_lost: true,
                document_id,
                field,
                value,
                ..
            } => {
                tracing::warn!(%document_id, %field, %value, "Stored rounded result");
            }
            MutationEvent::FieldUpdateRejected {
                document_id,
                field,
                reason,
                ..
            } => {
                tracing::warn!(%document_id, %field, %reason, "Update rejected");
            }
            _ => tracing::debug!("Collection event: {:?}", event),
        }
    }
}
