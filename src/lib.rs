pub mod db;
pub mod model;
pub mod services;
pub mod utils;

// The surface the embedding authentication layer works with. validate is called
// before a password change commits, password_changed after - everything else is
// wiring: pick a store, build a context, hand identities in.
pub use db::HistoryStore;
pub use db::memory::MemoryHistoryStore;
pub use db::mongo::MongoHistoryStore;
pub use model::algorithm::Algorithm;
pub use model::identity::Identity;
pub use model::policy::{ReusePolicy, RetentionWindow};
pub use model::requirements::CharacterPolicy;
pub use services::{ServiceContext, password_changed, validate};
pub use utils::config::Configuration;
pub use utils::errors::{ErrorCode, KeeperError};
