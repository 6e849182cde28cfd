use super::MongoDB;
use crate::models::UserRecord;
use crate::utils::CleanupError;
use async_trait::async_trait;
use futures::TryStreamExt; // Para cursor.try_next()
use mongodb::bson::{doc, Bson, Document};

/// Staged `profileImage: null` rewrites, committed together or not at all.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    ids: Vec<Bson>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn null_profile_image(&mut self, id: Bson) {
        self.ids.push(id);
    }

    pub fn ids(&self) -> &[Bson] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Read-all and batch-write access to a user collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whole collection, unfiltered and unordered.
    async fn fetch_users(&self, collection: &str) -> Result<Vec<UserRecord>, CleanupError>;

    /// Applies every staged rewrite atomically. Returns the number of
    /// documents updated.
    async fn commit(&self, collection: &str, batch: &WriteBatch) -> Result<u64, CleanupError>;
}

#[async_trait]
impl UserStore for MongoDB {
    async fn fetch_users(&self, collection: &str) -> Result<Vec<UserRecord>, CleanupError> {
        let read_error = |e: mongodb::error::Error| CleanupError::Read {
            collection: collection.to_string(),
            reason: e.to_string(),
        };

        let mut cursor = self
            .collection::<Document>(collection)
            .find(doc! {})
            .await
            .map_err(read_error)?;

        let mut users = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(read_error)? {
            users.push(UserRecord::from_document(&document));
        }

        log::debug!("Fetched {} documents from {}", users.len(), collection);

        Ok(users)
    }

    async fn commit(&self, collection: &str, batch: &WriteBatch) -> Result<u64, CleanupError> {
        let commit_error = |reason: String| CleanupError::Commit {
            collection: collection.to_string(),
            staged: batch.len(),
            reason,
        };

        if batch.is_empty() {
            return Ok(0);
        }

        let users = self.collection::<Document>(collection);
        let filter = doc! { "_id": { "$in": batch.ids().to_vec() } };
        let update = doc! { "$set": { "profileImage": Bson::Null } };

        let mut session = self
            .client()
            .start_session()
            .await
            .map_err(|e| commit_error(e.to_string()))?;

        session
            .start_transaction()
            .await
            .map_err(|e| commit_error(e.to_string()))?;

        let result = match users.update_many(filter, update).session(&mut session).await {
            Ok(result) => result,
            Err(e) => {
                let _ = session.abort_transaction().await;
                return Err(commit_error(e.to_string()));
            }
        };

        // Every staged document must still exist, same as a batched update
        if result.matched_count != batch.len() as u64 {
            let _ = session.abort_transaction().await;
            return Err(commit_error(format!(
                "only {} of {} staged documents still exist",
                result.matched_count,
                batch.len()
            )));
        }

        session
            .commit_transaction()
            .await
            .map_err(|e| commit_error(e.to_string()))?;

        Ok(result.modified_count)
    }
}
