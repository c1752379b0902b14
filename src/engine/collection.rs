// ============================================================================
// Collection
// In-memory document store that dispatches numeric field updates
// ============================================================================

use super::factory::create_operator;
use super::field_adapter::{evaluate_field, write_back, FieldMutation};
use crate::domain::{
    BatchErrorPolicy, Document, DocumentId, EngineConfig, FieldFilter, FieldValue, UpdateResult,
    UpdateSpec,
};
use crate::interfaces::{EventHandler, MutationEvent, UpdateOperator};
use crate::numeric::NumericResult;
use chrono::Utc;
use crossbeam_skiplist::SkipMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type SharedDocument = Arc<RwLock<Document>>;

/// Field state observed while computing a mutation, and what was computed
struct Precomputed {
    snapshot: Option<FieldValue>,
    outcome: NumericResult<FieldMutation>,
}

/// Named set of documents kept in insertion order
pub struct Collection {
    name: Arc<String>,

    /// Documents keyed by insertion sequence
    documents: Arc<SkipMap<u64, SharedDocument>>,

    /// Document id to insertion sequence
    index: Arc<RwLock<HashMap<DocumentId, u64>>>,

    config: EngineConfig,

    event_handler: Arc<dyn EventHandler>,

    sequence_counter: AtomicU64,
}

impl Collection {
    pub fn new(name: String, config: EngineConfig, event_handler: Arc<dyn EventHandler>) -> Self {
        Self {
            name: Arc::new(name),
            documents: Arc::new(SkipMap::new()),
            index: Arc::new(RwLock::new(HashMap::new())),
            config,
            event_handler,
            sequence_counter: AtomicU64::new(0),
        }
    }

    // ========================================================================
    // Insert / Query
    // ========================================================================

    /// Store a document. A document whose id is already present replaces
    /// the stored one in place.
    pub fn insert(&self, document: Document) -> DocumentId {
        let id = document.id();
        {
            // Held across lookup and insert so one id maps to one entry
            let mut index = self.index.write();
            match index.get(&id).copied().and_then(|seq| self.documents.get(&seq)) {
                Some(entry) => *entry.value().write() = document,
                None => {
                    let seq = self.sequence_counter.fetch_add(1, Ordering::AcqRel);
                    self.documents.insert(seq, Arc::new(RwLock::new(document)));
                    index.insert(id, seq);
                },
            }
        }

        self.event_handler.on_event(MutationEvent::DocumentInserted {
            document_id: id,
            timestamp: Utc::now(),
        });
        id
    }

    pub fn insert_many(&self, documents: impl IntoIterator<Item = Document>) -> Vec<DocumentId> {
        documents.into_iter().map(|doc| self.insert(doc)).collect()
    }

    /// Copy of a stored document
    pub fn get(&self, id: DocumentId) -> Option<Document> {
        let seq = self.index.read().get(&id).copied()?;
        self.documents.get(&seq).map(|entry| entry.value().read().clone())
    }

    /// Copies of the documents matching `filter` (all when `None`)
    pub fn find(&self, filter: Option<&FieldFilter>) -> Vec<Document> {
        self.documents
            .iter()
            .filter_map(|entry| {
                let doc = entry.value().read();
                Self::selects(filter, &doc).then(|| doc.clone())
            })
            .collect()
    }

    pub fn count(&self, filter: Option<&FieldFilter>) -> usize {
        self.documents
            .iter()
            .filter(|entry| Self::selects(filter, &entry.value().read()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Remove every document; returns how many were removed
    pub fn drop(&self) -> usize {
        let mut index = self.index.write();
        let removed = self.documents.len();
        self.documents.clear();
        index.clear();
        drop(index);

        tracing::debug!(collection = %self.name, removed, "Collection dropped");
        self.event_handler.on_event(MutationEvent::CollectionDropped {
            name: (*self.name).clone(),
            removed,
            timestamp: Utc::now(),
        });
        removed
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Apply `update` to every document matching `filter`.
    ///
    /// Documents are selected once, at the start of the call. New values are
    /// computed independently per document (on `parallel_workers` threads when
    /// configured) and written back in insertion order. Under
    /// `BatchErrorPolicy::AbortOnError` documents before the failing one keep
    /// their update and later ones are not touched.
    pub fn update_many(&self, filter: Option<&FieldFilter>, update: &UpdateSpec<'_>) -> UpdateResult {
        self.update(filter, update, usize::MAX)
    }

    /// Apply `update` to the first document matching `filter`.
    pub fn update_one(&self, filter: Option<&FieldFilter>, update: &UpdateSpec<'_>) -> UpdateResult {
        self.update(filter, update, 1)
    }

    fn update(&self, filter: Option<&FieldFilter>, update: &UpdateSpec<'_>, limit: usize) -> UpdateResult {
        let operator = create_operator(&update.operator, &self.config.arithmetic);
        let targets: Vec<SharedDocument> = self
            .documents
            .iter()
            .filter(|entry| Self::selects(filter, &entry.value().read()))
            .take(limit)
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut result = UpdateResult {
            matched: targets.len(),
            ..UpdateResult::default()
        };
        let precomputed = self.precompute(&targets, update, operator.as_ref());

        let mut events = Vec::with_capacity(targets.len());
        for (shared, computed) in targets.iter().zip(precomputed) {
            let mut doc = shared.write();
            let document_id = doc.id();

            // Recompute if the field changed since it was read
            let unchanged = match (doc.get(update.field), computed.snapshot.as_ref()) {
                (Some(now), Some(then)) => now.same_representation(then),
                (None, None) => true,
                _ => false,
            };
            let outcome = if unchanged {
                computed.outcome
            } else {
                evaluate_field(&doc, update.field, operator.as_ref(), &update.operand)
            };

            match outcome {
                Ok(mutation) => {
                    write_back(&mut doc, &mutation);
                    if mutation.changed {
                        result.modified += 1;
                    }
                    if mutation.precision_lost() {
                        result.precision_lost += 1;
                    }
                    events.push(MutationEvent::FieldUpdated {
                        document_id,
                        field: mutation.field,
                        previous: mutation.previous,
                        value: mutation.value,
                        precision_lost: mutation.signals.is_inexact(),
                        timestamp: Utc::now(),
                    });
                },
                Err(error) => {
                    tracing::warn!(
                        collection = %self.name,
                        %document_id,
                        operator = operator.name(),
                        %error,
                        "Field update failed"
                    );
                    events.push(MutationEvent::FieldUpdateRejected {
                        document_id,
                        field: update.field.to_string(),
                        reason: error.to_string(),
                        timestamp: Utc::now(),
                    });
                    result.errors.push((document_id, error));
                    if self.config.batch_errors == BatchErrorPolicy::AbortOnError {
                        result.aborted = true;
                        break;
                    }
                },
            }
        }

        tracing::debug!(
            collection = %self.name,
            operator = operator.name(),
            matched = result.matched,
            modified = result.modified,
            failed = result.errors.len(),
            "Update applied"
        );
        self.event_handler.on_events(events);
        result
    }

    /// Compute every target's mutation under a read lock.
    fn precompute(
        &self,
        targets: &[SharedDocument],
        update: &UpdateSpec<'_>,
        operator: &dyn UpdateOperator,
    ) -> Vec<Precomputed> {
        let evaluate = |shared: &SharedDocument| {
            let doc = shared.read();
            Precomputed {
                snapshot: doc.get(update.field).cloned(),
                outcome: evaluate_field(&doc, update.field, operator, &update.operand),
            }
        };

        let workers = self.config.parallel_workers.min(targets.len());
        if workers <= 1 {
            return targets.iter().map(&evaluate).collect();
        }

        let evaluate = &evaluate;
        let chunk_size = targets.len().div_ceil(workers);
        let scoped = crossbeam::scope(|scope| {
            let handles: Vec<_> = targets
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move |_| chunk.iter().map(evaluate).collect::<Vec<_>>()))
                .collect();

            let mut computed = Vec::with_capacity(targets.len());
            for handle in handles {
                match handle.join() {
                    Ok(part) => computed.extend(part),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            computed
        });

        match scoped {
            Ok(computed) => computed,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    fn selects(filter: Option<&FieldFilter>, document: &Document) -> bool {
        filter.map_or(true, |f| f.matches(document))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }
}
