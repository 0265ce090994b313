use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::algorithm::Algorithm;
use super::history::HistoryRecord;
use crate::utils::config::Configuration;
use crate::utils::errors::KeeperError;

///
/// The reuse policy in force: which hash configuration produces new digests and how
/// much history stays in scope.
///
/// A snapshot is taken fresh on every validator call, so a runtime re-configuration
/// (say, an iteration-count upgrade) applies from the next call without a restart.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReusePolicy {
    pub algorithm: Algorithm,
    pub iterations: u32,
    pub last_passwords: i32,
}

impl ReusePolicy {
    pub fn from_config(config: &Configuration) -> Result<Self, KeeperError> {
        Ok(ReusePolicy {
            algorithm: Algorithm::from_str(&config.algorithm)?,
            iterations: config.iterations,
            last_passwords: config.last_passwords,
        })
    }

    pub fn window(&self) -> RetentionWindow {
        RetentionWindow::new(self.last_passwords)
    }

    ///
    /// The help text shown to the end user alongside a password_used rejection.
    ///
    pub fn help_text(&self) -> String {
        match self.last_passwords > 0 {
            true  => format!("Your new password cannot be identical to any of the {} previously used passwords", self.last_passwords),
            false => String::from("Your new password cannot be identical to any previously used password"),
        }
    }
}

impl Default for ReusePolicy {
    fn default() -> Self {
        ReusePolicy {
            algorithm: Algorithm::Argon,
            iterations: 1,
            last_passwords: 0, // Keep everything.
        }
    }
}


///
/// How much of a user's history counts for reuse checks.
///
/// Bounded (last_passwords > 0) keeps the most recent last_passwords records,
/// scanning across ALL the user's bindings jointly - a record under a deprecated
/// algorithm still occupies a window slot until it ages out. Non-positive means
/// unbounded: nothing ever ages out.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetentionWindow {
    last_passwords: i32,
}

impl RetentionWindow {
    pub fn new(last_passwords: i32) -> Self {
        RetentionWindow { last_passwords }
    }

    pub fn unbounded() -> Self {
        RetentionWindow::new(0)
    }

    pub fn is_bounded(&self) -> bool {
        self.last_passwords > 0
    }

    ///
    /// The records still counted for reuse checks. The slice passed in must be
    /// ordered newest-first, as the store returns it.
    ///
    pub fn in_scope<'a>(&self, records: &'a [HistoryRecord]) -> &'a [HistoryRecord] {
        match self.is_bounded() {
            true  => &records[..(self.last_passwords as usize).min(records.len())],
            false => records,
        }
    }

    ///
    /// The records that have fallen out of the window and are eligible for pruning.
    ///
    pub fn aged_out<'a>(&self, records: &'a [HistoryRecord]) -> &'a [HistoryRecord] {
        match self.is_bounded() {
            true  => &records[(self.last_passwords as usize).min(records.len())..],
            false => &[],
        }
    }
}
