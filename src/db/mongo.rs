use tracing::{debug, info};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use super::HistoryStore;
use super::prelude::*;
use crate::model::algorithm::Algorithm;
use crate::model::binding::HashBinding;
use crate::model::history::HistoryRecord;
use crate::utils;
use crate::utils::config::Configuration;
use crate::utils::errors::{ErrorCode, KeeperError};
use mongodb::error::ErrorKind;
use mongodb::{Client, Database, bson::{Document, doc}, options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument}};

///
/// The production store - bindings and history live in MongoDB.
///
pub struct MongoHistoryStore {
    db: Database,
}

impl MongoHistoryStore {
    ///
    /// Wrap the database handle. Call update_mongo first to ensure the
    /// indexes this store relies on exist.
    ///
    pub fn new(db: Database) -> Self {
        MongoHistoryStore { db }
    }

    ///
    /// Allocate the next insertion sequence number for the user - a findAndModify
    /// upsert keeps it monotonic even across processes.
    ///
    async fn next_seq(&self, user_id: &str) -> Result<i64, KeeperError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self.db.collection::<Document>(COUNTERS)
            .find_one_and_update(
                doc!{ COUNTER_ID: user_id },
                doc!{ "$inc": { SEQ: 1i64 } },
                options)
            .await?
            .ok_or_else(|| ErrorCode::MongoDBError.with_msg("The counter document was not returned from the upsert"))?;

        Ok(counter.get_i64(SEQ)?)
    }
}

#[async_trait]
impl HistoryStore for MongoHistoryStore {
    async fn load_bindings(&self, user_id: &str) -> Result<Vec<HashBinding>, KeeperError> {
        let options = FindOptions::builder()
            .sort(doc!{ CREATED_ON: 1 })
            .build();

        let cursor = self.db.collection::<HashBinding>(BINDINGS)
            .find(doc!{ USER_ID: user_id }, options)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_binding(&self, user_id: &str, algorithm: Algorithm, iterations: u32)
        -> Result<Option<HashBinding>, KeeperError> {

        let filter = doc!{
            USER_ID: user_id,
            ALGORITHM: algorithm.to_string(),
            ITERATIONS: iterations,
        };

        Ok(self.db.collection::<HashBinding>(BINDINGS).find_one(filter, None).await?)
    }

    async fn create_binding(&self, binding: HashBinding) -> Result<HashBinding, KeeperError> {
        let result = self.db.collection::<HashBinding>(BINDINGS)
            .insert_one(&binding, None)
            .await;

        match result {
            Ok(_) => Ok(binding),
            Err(err) if is_duplicate_err(&err) => {
                // A concurrent first-time change created the binding - use theirs.
                debug!("Binding for user {} already created, re-loading it", binding.user_id);
                self.find_binding(&binding.user_id, binding.algorithm, binding.iterations)
                    .await?
                    .ok_or_else(|| ErrorCode::MongoDBError.with_msg("A duplicate binding exists but could not be loaded"))
            },
            Err(err) => Err(KeeperError::from(err)),
        }
    }

    async fn load_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, KeeperError> {
        let options = FindOptions::builder()
            .sort(doc!{ CREATED_ON: -1, SEQ: -1 })
            .build();

        let cursor = self.db.collection::<HistoryRecord>(HISTORY)
            .find(doc!{ USER_ID: user_id }, options)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn append(&self, user_id: &str, binding_id: &str, digest: &str, created_on: bson::DateTime)
        -> Result<(), KeeperError> {

        let record = HistoryRecord {
            record_id: utils::generate_id(),
            user_id: user_id.to_string(),
            binding_id: binding_id.to_string(),
            digest: digest.to_string(),
            created_on,
            seq: self.next_seq(user_id).await?,
        };

        let result = self.db.collection::<HistoryRecord>(HISTORY)
            .insert_one(record, None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_err(&err) => {
                // The binding already holds this digest - the original record keeps
                // its place in the ordering.
                debug!("Digest already recorded for user {}, leaving the existing record", user_id);
                Ok(())
            },
            Err(err) => Err(KeeperError::from(err)),
        }
    }

    async fn delete_records(&self, user_id: &str, record_ids: &[String]) -> Result<u64, KeeperError> {
        let filter = doc!{
            USER_ID: user_id,
            RECORD_ID: { "$in": record_ids.to_vec() },
        };

        let result = self.db.collection::<HistoryRecord>(HISTORY)
            .delete_many(filter, None)
            .await?;

        Ok(result.deleted_count)
    }
}


///
/// Run any schema-like updates against MongoDB that haven't been run yet.
///
pub async fn update_mongo(db: &Database) -> Result<(), KeeperError> {
    create_init_indexes(db).await?;
    Ok(())
}

async fn create_init_indexes(db: &Database) -> Result<(), KeeperError> {
    // Note: the current driver doesn't yet support creating indexes on collections, so the dbcommand must be used instead.
    // https://docs.mongodb.com/manual/reference/command/createIndexes/#createindexes

    // The unique config index makes lazily-created bindings race-safe, and the
    // unique digest index makes appends idempotent.
    db.run_command(doc! { "createIndexes": BINDINGS, "indexes": [
        { "key": { BINDING_ID: 1 }, "name": "idx_binding_id", "unique": true },
        { "key": { USER_ID: 1, ALGORITHM: 1, ITERATIONS: 1 }, "name": "idx_binding_config", "unique": true }] }, None).await?;

    db.run_command(doc! { "createIndexes": HISTORY, "indexes": [
        { "key": { RECORD_ID: 1 }, "name": "idx_record_id", "unique": true },
        { "key": { BINDING_ID: 1, DIGEST: 1 }, "name": "idx_binding_digest", "unique": true },
        { "key": { USER_ID: 1 }, "name": "idx_user_id", "unique": false }] }, None).await?;

    db.run_command(doc! { "createIndexes": COUNTERS, "indexes": [
        { "key": { COUNTER_ID: 1 }, "name": "idx_counter_id", "unique": true }] }, None).await?;

    Ok(())
}

///
/// Indicates if the MongoDB error is from a duplicate key violation.
///
pub fn is_duplicate_err(err: &mongodb::error::Error) -> bool {
    let ec = err.clone();
    match *ec.kind {
        ErrorKind::Write(sub_err) => match sub_err {
            mongodb::error::WriteFailure::WriteError(we) => {
                if we.code == 11000 /* Duplicate insert */ {
                    return true
                }

                false
            },
            _ => false,
        },
        _ => return false
    }
}

///
/// Connect to MongoDB with the URI configured - credential sourcing belongs to the
/// embedding service, which substitutes them into the URI before calling.
///
pub async fn get_mongo_db(app_name: &str, config: &Configuration) -> Result<Database, KeeperError> {
    // Parse the uri now.
    let mut client_options = ClientOptions::parse(&config.mongo_uri).await?;

    // Manually set an option.
    client_options.app_name = Some(app_name.to_string());

    // Get a handle to the deployment.
    let client = Client::with_options(client_options)?;

    info!("Connecting to MongoDB...");

    let db = client.database(&config.db_name);
    ping(&db).await?;

    info!("Connected to MongoDB");
    Ok(db)
}


pub async fn ping(db: &Database) -> Result<Document, KeeperError> {
    Ok(db.run_command(doc! { "ping": 1 }, None).await?)
}
