use serde::{Deserialize, Serialize};

///
/// One historical password digest.
///
/// Records are appended when the authentication layer reports a password change and
/// deleted only by retention pruning. Within a binding digests are unique - changing
/// a password to a value already recorded leaves the existing record (and therefore
/// its position in the recency ordering) untouched.
///
/// created_on orders records newest-first; seq is a per-user insertion counter that
/// breaks ties when two records land on the same clock tick.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryRecord {
    pub record_id: String,
    pub user_id: String,
    pub binding_id: String,
    pub digest: String,
    pub created_on: bson::DateTime,
    pub seq: i64,
}
