//! Commit coordination
//!
//! Turns the overlay diff into one update request per record, tracks the
//! outstanding requests of the batch in flight, and folds the per-record
//! outcomes into a single summary. Requests complete in any order.
//!
//! The coordinator never calls the store itself: it hands `UpdateRequest`s
//! to the runtime (via `Cmd::UpdateRecords`) and is fed the outcomes back
//! one `CommitMsg::RecordUpdated` at a time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use crate::grid::CommitDiff;
use crate::model::{PartialFields, Record, RecordId, Schema};
use crate::store::UpdateError;

/// Identifies one commit batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(pub u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One `update(id, fields)` call to make
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub batch: BatchId,
    pub record: RecordId,
    pub fields: PartialFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("no pending edits to commit")]
    NothingToCommit,
    #[error("commit {0} is still in flight")]
    AlreadyInFlight(BatchId),
}

/// Result of a settled batch
#[derive(Debug, Clone, PartialEq)]
pub struct CommitSummary {
    pub batch: BatchId,
    pub succeeded: Vec<RecordId>,
    pub failed: Vec<(RecordId, UpdateError)>,
}

impl CommitSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// The single line shown to the user for this batch
    pub fn message(&self) -> String {
        let total = self.succeeded.len() + self.failed.len();
        if self.is_success() {
            format!("Committed {} record(s)", total)
        } else {
            format!(
                "{} of {} record(s) failed to update",
                self.failed.len(),
                total
            )
        }
    }

    pub fn error_for(&self, record: &RecordId) -> Option<&UpdateError> {
        self.failed
            .iter()
            .find(|(id, _)| id == record)
            .map(|(_, err)| err)
    }
}

/// What the model should do with one record's outcome
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Merge `record` into the baseline and settle the overlay entries that
    /// still hold the `committed` values
    Succeeded {
        record: Record,
        committed: BTreeMap<String, String>,
    },
    /// Overlay entries stay for a retry
    Failed,
}

#[derive(Debug)]
struct InFlightBatch {
    id: BatchId,
    /// Raw overlay strings sent per record
    dispatched: BTreeMap<RecordId, BTreeMap<String, String>>,
    outstanding: BTreeSet<RecordId>,
    succeeded: Vec<RecordId>,
    failed: Vec<(RecordId, UpdateError)>,
}

#[derive(Debug, Default)]
pub struct CommitCoordinator {
    next_batch: u64,
    in_flight: Option<InFlightBatch>,
    last: Option<CommitSummary>,
}

impl CommitCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_batch(&self) -> Option<BatchId> {
        self.in_flight.as_ref().map(|b| b.id)
    }

    /// Number of records still waiting for an outcome
    pub fn outstanding(&self) -> usize {
        self.in_flight.as_ref().map_or(0, |b| b.outstanding.len())
    }

    /// Summary of the most recently settled batch
    pub fn last_summary(&self) -> Option<&CommitSummary> {
        self.last.as_ref()
    }

    /// Open a batch for `diff`.
    ///
    /// Each record's strings are coerced through the schema first; a record
    /// that fails coercion is recorded as a `Validation` failure and never
    /// reaches the store. The returned requests are the calls to make, which
    /// may be empty if every record failed coercion (the batch then settles
    /// on the next `take_settled`).
    pub fn begin(
        &mut self,
        diff: CommitDiff,
        schema: &Schema,
        date_format: &str,
    ) -> Result<Vec<UpdateRequest>, CommitError> {
        if let Some(batch) = &self.in_flight {
            return Err(CommitError::AlreadyInFlight(batch.id));
        }
        if diff.is_empty() {
            return Err(CommitError::NothingToCommit);
        }

        self.next_batch += 1;
        let id = BatchId(self.next_batch);
        let mut batch = InFlightBatch {
            id,
            dispatched: BTreeMap::new(),
            outstanding: BTreeSet::new(),
            succeeded: Vec::new(),
            failed: Vec::new(),
        };

        let mut requests = Vec::with_capacity(diff.len());
        for (record, raw) in diff {
            match schema.coerce_fields(&raw, date_format) {
                Ok(fields) => {
                    batch.outstanding.insert(record.clone());
                    batch.dispatched.insert(record.clone(), raw);
                    requests.push(UpdateRequest {
                        batch: id,
                        record,
                        fields,
                    });
                }
                Err(err) => {
                    tracing::debug!(target: "commit", batch = %id, record = %record, "coercion failed: {}", err);
                    batch.failed.push((record, err.into()));
                }
            }
        }

        tracing::info!(
            target: "commit",
            batch = %id,
            requests = requests.len(),
            rejected = batch.failed.len(),
            "commit batch started"
        );
        self.in_flight = Some(batch);
        Ok(requests)
    }

    /// Record one update result.
    ///
    /// Returns `None` for results that do not belong to the batch in flight
    /// (stale batch, unknown or already settled record).
    pub fn record_outcome(
        &mut self,
        batch: BatchId,
        record: RecordId,
        result: Result<Record, UpdateError>,
    ) -> Option<RecordOutcome> {
        let Some(current) = self.in_flight.as_mut().filter(|b| b.id == batch) else {
            tracing::warn!(target: "commit", batch = %batch, record = %record, "ignoring outcome for a batch that is not in flight");
            return None;
        };
        if !current.outstanding.remove(&record) {
            tracing::warn!(target: "commit", batch = %batch, record = %record, "ignoring duplicate or unknown outcome");
            return None;
        }

        match result {
            Ok(updated) => {
                let committed = current.dispatched.remove(&record).unwrap_or_default();
                current.succeeded.push(record);
                Some(RecordOutcome::Succeeded {
                    record: updated,
                    committed,
                })
            }
            Err(err) => {
                tracing::debug!(target: "commit", batch = %batch, record = %record, "update failed: {}", err);
                current.failed.push((record, err));
                Some(RecordOutcome::Failed)
            }
        }
    }

    /// Close the batch once every outcome is in
    pub fn take_settled(&mut self) -> Option<CommitSummary> {
        if self.in_flight.as_ref()?.outstanding.is_empty() {
            let batch = self.in_flight.take()?;
            let summary = CommitSummary {
                batch: batch.id,
                succeeded: batch.succeeded,
                failed: batch.failed,
            };
            tracing::info!(
                target: "commit",
                batch = %summary.batch,
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                "commit batch settled"
            );
            self.last = Some(summary.clone());
            return Some(summary);
        }
        None
    }
}
