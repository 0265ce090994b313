use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::algorithm::{self, Algorithm};
use crate::utils;
use crate::utils::errors::KeeperError;

///
/// How digests are produced for one user under one hash configuration.
///
/// A user accumulates one binding per distinct (algorithm, iterations) pair ever
/// configured while they changed a password. The binding's salt is generated once
/// at creation and never changes, which keeps digests comparable by value: old
/// history remains checkable after an algorithm or work-factor upgrade, because
/// the candidate password is simply re-digested under each binding the user has.
///
/// Bindings are never mutated and never deleted while history records reference them.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HashBinding {
    pub binding_id: String,
    pub user_id: String,
    pub algorithm: Algorithm,
    pub iterations: u32,
    pub salt: String,
    pub created_on: bson::DateTime,
}

impl HashBinding {
    ///
    /// A new binding for the user with a freshly generated salt.
    ///
    pub fn new(user_id: &str, algorithm: Algorithm, iterations: u32, created_on: DateTime<Utc>) -> Self {
        HashBinding {
            binding_id: utils::generate_id(),
            user_id: user_id.to_string(),
            algorithm,
            iterations,
            salt: algorithm::generate_salt(),
            created_on: bson::DateTime::from_chrono(created_on),
        }
    }

    ///
    /// Digest the plain text password under this binding's configuration and salt.
    ///
    pub fn digest(&self, plain_text_password: &str) -> Result<String, KeeperError> {
        algorithm::digest(self.algorithm, plain_text_password, &self.salt, self.iterations)
    }
}
