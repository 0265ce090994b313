pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use crate::model::algorithm::Algorithm;
use crate::model::binding::HashBinding;
use crate::model::history::HistoryRecord;
use crate::utils::errors::KeeperError;

pub mod prelude {
    // Collection names.
    pub const BINDINGS: &str = "Bindings";
    pub const HISTORY:  &str = "History";
    pub const COUNTERS: &str = "Counters";

    // Field names.
    pub const ALGORITHM:  &str = "algorithm";
    pub const BINDING_ID: &str = "binding_id";
    pub const COUNTER_ID: &str = "counter_id";
    pub const CREATED_ON: &str = "created_on";
    pub const DIGEST:     &str = "digest";
    pub const ITERATIONS: &str = "iterations";
    pub const RECORD_ID:  &str = "record_id";
    pub const SEQ:        &str = "seq";
    pub const USER_ID:    &str = "user_id";
}

///
/// The persistence collaborator for bindings and history records.
///
/// Mutating operations are scoped by user and must never touch another user's rows.
/// The validator serialises mutations per user, so implementations only need
/// read-committed isolation - the unique indexes described on each method are the
/// backstop against concurrent first-time writes.
///
#[async_trait]
pub trait HistoryStore: Send + Sync {
    ///
    /// Every hash binding the user has accumulated, oldest first.
    ///
    async fn load_bindings(&self, user_id: &str) -> Result<Vec<HashBinding>, KeeperError>;

    ///
    /// The user's binding for this exact (algorithm, iterations) pair, if one exists.
    ///
    async fn find_binding(&self, user_id: &str, algorithm: Algorithm, iterations: u32)
        -> Result<Option<HashBinding>, KeeperError>;

    ///
    /// Persist a new binding. Get-or-create semantics: if a concurrent caller created
    /// a binding for the same (user, algorithm, iterations) first, that winning
    /// binding is returned instead of the one passed in.
    ///
    async fn create_binding(&self, binding: HashBinding) -> Result<HashBinding, KeeperError>;

    ///
    /// All history records for the user across all their bindings, newest first.
    /// Records sharing a timestamp are ordered by their insertion sequence.
    ///
    async fn load_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, KeeperError>;

    ///
    /// Record a digest unless the binding already has it. Deduplication is by value
    /// against the binding's FULL record set, not just the in-scope window, and an
    /// existing record keeps its original position - re-recording an old password
    /// must not refresh it to the front of the window.
    ///
    async fn append(&self, user_id: &str, binding_id: &str, digest: &str, created_on: bson::DateTime)
        -> Result<(), KeeperError>;

    ///
    /// Delete the identified records belonging to the user. Returns the number deleted.
    ///
    async fn delete_records(&self, user_id: &str, record_ids: &[String]) -> Result<u64, KeeperError>;
}
