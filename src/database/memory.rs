use super::user_store::{UserStore, WriteBatch};
use crate::models::{UserRecord, ID_FIELD, PROFILE_IMAGE_FIELD};
use crate::utils::CleanupError;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// In-process stand-in for the document store.
#[derive(Default)]
pub struct InMemoryUserStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    fail_reads: AtomicBool,
    fail_commits: AtomicBool,
    commits: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn with_documents(collection: &str, documents: Vec<Document>) -> Self {
        let store = Self::default();
        if let Ok(mut collections) = store.collections.write() {
            collections.insert(collection.to_string(), documents);
        }
        store
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .ok()
            .and_then(|c| c.get(collection).cloned())
            .unwrap_or_default()
    }

    pub fn remove(&self, collection: &str, id: &Bson) {
        if let Ok(mut collections) = self.collections.write() {
            if let Some(documents) = collections.get_mut(collection) {
                documents.retain(|d| d.get(ID_FIELD) != Some(id));
            }
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn fetch_users(&self, collection: &str) -> Result<Vec<UserRecord>, CleanupError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CleanupError::Read {
                collection: collection.to_string(),
                reason: "injected read failure".to_string(),
            });
        }

        Ok(self
            .documents(collection)
            .iter()
            .map(UserRecord::from_document)
            .collect())
    }

    async fn commit(&self, collection: &str, batch: &WriteBatch) -> Result<u64, CleanupError> {
        let commit_error = |reason: String| CleanupError::Commit {
            collection: collection.to_string(),
            staged: batch.len(),
            reason,
        };

        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(commit_error("injected commit failure".to_string()));
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|e| commit_error(e.to_string()))?;
        let documents = collections.entry(collection.to_string()).or_default();

        // Validate the whole batch before touching anything
        let mut targets = Vec::with_capacity(batch.len());
        for id in batch.ids() {
            match documents.iter().position(|d| d.get(ID_FIELD) == Some(id)) {
                Some(index) => targets.push(index),
                None => return Err(commit_error(format!("document {} not found", id))),
            }
        }

        let mut modified = 0;
        for index in targets {
            let document = &mut documents[index];
            if document.get(PROFILE_IMAGE_FIELD) != Some(&Bson::Null) {
                modified += 1;
            }
            document.insert(PROFILE_IMAGE_FIELD, Bson::Null);
        }

        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(modified)
    }
}
