mod password_changed;
mod validate;

pub use password_changed::password_changed;
pub use validate::validate;

use std::sync::Arc;
use std::collections::HashMap;
use tracing::warn;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use crate::db::HistoryStore;
use crate::model::identity::Identity;
use crate::model::policy::ReusePolicy;
use crate::utils::time_provider::TimeProvider;

///
/// Shared by the validator entry points - gives them access to the store, the policy
/// in force and the clock.
///
pub struct ServiceContext {
    store: Arc<dyn HistoryStore>,

    active_policy: RwLock<ReusePolicy>,

    time_provider: RwLock<TimeProvider>,

    // One mutation lock per user - see user_lock below.
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn HistoryStore>, policy: ReusePolicy) -> Self {
        ServiceContext {
            store,
            active_policy: RwLock::new(policy),
            time_provider: RwLock::new(TimeProvider::default()),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &dyn HistoryStore {
        self.store.as_ref()
    }

    ///
    /// A snapshot of the policy in force - taken fresh on every call, never cached by
    /// the callers, so apply_policy takes effect from the very next call.
    ///
    pub fn active_policy(&self) -> ReusePolicy {
        self.active_policy.read().clone()
    }

    ///
    /// Update the policy in force - a retention or hash re-configuration at runtime.
    ///
    pub fn apply_policy(&self, policy: ReusePolicy) {
        *self.active_policy.write() = policy;
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.time_provider.read().now()
    }

    ///
    /// Set or clear the fixed time - tests use this to make history ordering deterministic.
    ///
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        self.time_provider.write().fix(now);
    }

    ///
    /// The mutation lock for one user. Append-then-prune must observe a settled
    /// history, so concurrent changes for the same user serialise here; changes for
    /// different users don't contend.
    ///
    pub(crate) fn user_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.user_locks.lock()
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }
}

///
/// The identity to track history against, if there is one.
///
/// An absent or not-yet-persisted identity has no stable identifier to key history
/// on (account-creation flows hit this), so the policy is skipped rather than failed.
///
pub(crate) fn tracked_user(user: Option<&dyn Identity>) -> Option<&dyn Identity> {
    match user {
        None => None,
        Some(user) if !user.is_persisted() => {
            warn!("Skipping password history for an unsaved user");
            None
        },
        Some(user) => Some(user),
    }
}
