use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use keeper::model::algorithm::Algorithm;
use keeper::model::binding::HashBinding;
use keeper::model::history::HistoryRecord;
use keeper::{ErrorCode, HistoryStore, Identity, KeeperError, MemoryHistoryStore, ReusePolicy, ServiceContext, validate};

///
/// A context over a fresh in-memory store with the given retention window.
///
pub fn context(last_passwords: i32) -> ServiceContext {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    ServiceContext::new(Arc::new(MemoryHistoryStore::new()), test_policy(last_passwords))
}

///
/// Single-round PBKDF2 keeps the suite fast - the policy logic under test doesn't
/// care how slow the digest is.
///
pub fn test_policy(last_passwords: i32) -> ReusePolicy {
    ReusePolicy {
        algorithm: Algorithm::PBKDF2,
        iterations: 1,
        last_passwords,
    }
}

///
/// Numbered passwords, like a user cycling through variations of a favourite.
///
pub fn pwd(number: u32) -> String {
    format!("SuperSecret!_{}", number)
}

///
/// A stand-in for the authentication layer's user entity.
///
pub struct TestUser {
    user_id: String,
    persisted: bool,
}

impl TestUser {
    pub fn saved(user_id: &str) -> Self {
        TestUser { user_id: user_id.to_string(), persisted: true }
    }

    pub fn unsaved(user_id: &str) -> Self {
        TestUser { user_id: user_id.to_string(), persisted: false }
    }
}

impl Identity for TestUser {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn is_persisted(&self) -> bool {
        self.persisted
    }
}

///
/// Change the user's password and expect it to record cleanly.
///
pub async fn change(ctx: &ServiceContext, user: &TestUser, plain_text_password: &str) {
    keeper::password_changed(ctx, plain_text_password, Some(user))
        .await
        .expect("the password change should have been recorded");
}

pub async fn assert_accepted(ctx: &ServiceContext, plain_text_password: &str, user: &TestUser) {
    validate(ctx, plain_text_password, Some(user))
        .await
        .expect("the password should have been accepted");
}

pub async fn assert_reuse_rejected(ctx: &ServiceContext, plain_text_password: &str, user: &TestUser) {
    let err = validate(ctx, plain_text_password, Some(user))
        .await
        .expect_err("the password should have been rejected as previously used");

    assert_eq!(err.error_code(), ErrorCode::PasswordUsedBefore);
    assert_eq!(err.error_code().code(), "password_used");
}

///
/// Wraps the in-memory store and counts every call through the trait - used to
/// prove transient identities cause no storage traffic at all.
///
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryHistoryStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryStore for CountingStore {
    async fn load_bindings(&self, user_id: &str) -> Result<Vec<HashBinding>, KeeperError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_bindings(user_id).await
    }

    async fn find_binding(&self, user_id: &str, algorithm: Algorithm, iterations: u32)
        -> Result<Option<HashBinding>, KeeperError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_binding(user_id, algorithm, iterations).await
    }

    async fn create_binding(&self, binding: HashBinding) -> Result<HashBinding, KeeperError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.create_binding(binding).await
    }

    async fn load_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, KeeperError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_history(user_id).await
    }

    async fn append(&self, user_id: &str, binding_id: &str, digest: &str, created_on: bson::DateTime)
        -> Result<(), KeeperError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.append(user_id, binding_id, digest, created_on).await
    }

    async fn delete_records(&self, user_id: &str, record_ids: &[String]) -> Result<u64, KeeperError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_records(user_id, record_ids).await
    }
}
