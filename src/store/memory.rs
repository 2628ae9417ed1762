//! Thread-safe in-memory record store
//!
//! Backs the demo binary and the tests. Failures can be injected per record
//! and an artificial latency makes concurrent updates overlap.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{FetchError, RecordStore, UpdateError};
use crate::grid::ColumnFilters;
use crate::model::{PartialFields, Record, RecordId};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
    update_failures: Mutex<HashMap<RecordId, UpdateError>>,
    list_failure: Mutex<Option<FetchError>>,
    /// Per-record extra latency, applied on top of `latency`
    delays: Mutex<HashMap<RecordId, Duration>>,
    latency: Duration,
    update_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every future update of `id` fail with `error`
    pub fn fail_updates_for(&self, id: impl Into<RecordId>, error: UpdateError) {
        lock(&self.update_failures).insert(id.into(), error);
    }

    /// Make updates of `id` finish later than the others
    pub fn delay_updates_for(&self, id: impl Into<RecordId>, delay: Duration) {
        lock(&self.delays).insert(id.into(), delay);
    }

    /// Make the next list calls fail until cleared
    pub fn fail_list(&self, error: Option<FetchError>) {
        *lock(&self.list_failure) = error;
    }

    pub fn clear_failures(&self) {
        lock(&self.update_failures).clear();
        *lock(&self.list_failure) = None;
    }

    /// Number of update calls that reached the store
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> Vec<Record> {
        lock(&self.records).clone()
    }

    pub fn get(&self, id: &RecordId) -> Option<Record> {
        lock(&self.records).iter().find(|r| r.id == *id).cloned()
    }

    fn sleep(&self, extra: Duration) {
        let total = self.latency + extra;
        if !total.is_zero() {
            std::thread::sleep(total);
        }
    }
}

/// Poisoning only happens if a holder panicked; the data itself is still usable
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordStore for MemoryStore {
    fn list(&self, filter: Option<&ColumnFilters>) -> Result<Vec<Record>, FetchError> {
        self.sleep(Duration::ZERO);
        if let Some(err) = lock(&self.list_failure).clone() {
            tracing::debug!(target: "store", "list failing on request: {}", err);
            return Err(err);
        }

        let records = lock(&self.records);
        Ok(records
            .iter()
            .filter(|r| filter.map_or(true, |f| f.matches(r)))
            .cloned()
            .collect())
    }

    fn update(&self, id: &RecordId, fields: &PartialFields) -> Result<Record, UpdateError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let extra = lock(&self.delays).get(id).copied().unwrap_or_default();
        self.sleep(extra);

        if let Some(err) = lock(&self.update_failures).get(id).cloned() {
            tracing::debug!(target: "store", record = %id, "update failing on request: {}", err);
            return Err(err);
        }

        let mut records = lock(&self.records);
        let record = records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| UpdateError::NotFound(id.clone()))?;

        if let Some(unknown) = fields.keys().find(|k| record.get(k).is_none()) {
            return Err(UpdateError::Validation(format!("unknown column `{unknown}`")));
        }

        record.merge(fields);
        tracing::trace!(target: "store", record = %id, columns = fields.len(), "record updated");
        Ok(record.clone())
    }
}
