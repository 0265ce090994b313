use std::collections::HashMap;
use tracing::debug;
use async_trait::async_trait;
use parking_lot::Mutex;
use super::HistoryStore;
use crate::model::algorithm::Algorithm;
use crate::model::binding::HashBinding;
use crate::model::history::HistoryRecord;
use crate::utils;
use crate::utils::errors::KeeperError;

///
/// An in-memory store - used by the test-suite and by embedders that don't want
/// a MongoDB dependency. Behaviour mirrors the Mongo store: get-or-create bindings,
/// by-value digest dedup and newest-first ordered reads with sequence tie-breaks.
///
#[derive(Default)]
pub struct MemoryHistoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    bindings: Vec<HashBinding>,
    records: Vec<HistoryRecord>,
    next_seq: HashMap<String, i64>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        MemoryHistoryStore::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load_bindings(&self, user_id: &str) -> Result<Vec<HashBinding>, KeeperError> {
        let inner = self.inner.lock();

        // Insertion order is creation order, so no sort is needed.
        Ok(inner.bindings.iter()
            .filter(|binding| binding.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_binding(&self, user_id: &str, algorithm: Algorithm, iterations: u32)
        -> Result<Option<HashBinding>, KeeperError> {

        let inner = self.inner.lock();

        Ok(inner.bindings.iter()
            .find(|binding| binding.user_id == user_id
                && binding.algorithm == algorithm
                && binding.iterations == iterations)
            .cloned())
    }

    async fn create_binding(&self, binding: HashBinding) -> Result<HashBinding, KeeperError> {
        let mut inner = self.inner.lock();

        // Get-or-create: a binding for this configuration may already exist.
        if let Some(existing) = inner.bindings.iter()
            .find(|existing| existing.user_id == binding.user_id
                && existing.algorithm == binding.algorithm
                && existing.iterations == binding.iterations) {
            return Ok(existing.clone())
        }

        inner.bindings.push(binding.clone());
        Ok(binding)
    }

    async fn load_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, KeeperError> {
        let inner = self.inner.lock();

        let mut records: Vec<HistoryRecord> = inner.records.iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();

        // Newest first - the insertion sequence breaks same-instant ties.
        records.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.seq.cmp(&a.seq)));
        Ok(records)
    }

    async fn append(&self, user_id: &str, binding_id: &str, digest: &str, created_on: bson::DateTime)
        -> Result<(), KeeperError> {

        let mut inner = self.inner.lock();

        // Dedup by value against the binding's full record set - the existing
        // record keeps its place in the ordering.
        if inner.records.iter().any(|record| record.binding_id == binding_id && record.digest == digest) {
            debug!("Digest already recorded for user {}, leaving the existing record", user_id);
            return Ok(())
        }

        let seq = inner.next_seq.entry(user_id.to_string()).or_insert(0);
        *seq += 1;
        let seq = *seq;

        inner.records.push(HistoryRecord {
            record_id: utils::generate_id(),
            user_id: user_id.to_string(),
            binding_id: binding_id.to_string(),
            digest: digest.to_string(),
            created_on,
            seq,
        });

        Ok(())
    }

    async fn delete_records(&self, user_id: &str, record_ids: &[String]) -> Result<u64, KeeperError> {
        let mut inner = self.inner.lock();

        let before = inner.records.len();
        inner.records.retain(|record| record.user_id != user_id || !record_ids.contains(&record.record_id));

        Ok((before - inner.records.len()) as u64)
    }
}
