//! Record store contract and an in-memory implementation.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::posting::{Posting, PostingFields, PostingId};

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No posting with this id exists.
    #[error("posting not found: {0}")]
    NotFound(PostingId),

    /// The backing storage failed.
    #[error("store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Persistence for postings, keyed by store-assigned id.
///
/// Implementations must never reuse an id, and each call is a single atomic
/// unit from the caller's point of view.
pub trait RecordStore {
    /// Persist a new posting and return its fresh id.
    fn create(&mut self, fields: &PostingFields) -> Result<PostingId, StoreError>;

    /// All postings in id order.
    fn fetch_all(&self) -> Result<Vec<Posting>, StoreError>;

    fn fetch_by_id(&self, id: PostingId) -> Result<Option<Posting>, StoreError>;

    /// Replace every field of an existing posting.
    fn update_by_id(&mut self, id: PostingId, fields: &PostingFields) -> Result<(), StoreError>;

    fn delete_by_id(&mut self, id: PostingId) -> Result<(), StoreError>;

    /// Check that the store is reachable.
    fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn create(&mut self, fields: &PostingFields) -> Result<PostingId, StoreError> {
        (**self).create(fields)
    }

    fn fetch_all(&self) -> Result<Vec<Posting>, StoreError> {
        (**self).fetch_all()
    }

    fn fetch_by_id(&self, id: PostingId) -> Result<Option<Posting>, StoreError> {
        (**self).fetch_by_id(id)
    }

    fn update_by_id(&mut self, id: PostingId, fields: &PostingFields) -> Result<(), StoreError> {
        (**self).update_by_id(id, fields)
    }

    fn delete_by_id(&mut self, id: PostingId) -> Result<(), StoreError> {
        (**self).delete_by_id(id)
    }

    fn health_check(&self) -> Result<(), StoreError> {
        (**self).health_check()
    }
}

/// In-memory record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    postings: BTreeMap<PostingId, PostingFields>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn create(&mut self, fields: &PostingFields) -> Result<PostingId, StoreError> {
        self.last_id += 1;
        let id = PostingId::new(self.last_id);
        self.postings.insert(id, fields.clone());
        debug!(posting_id = %id, "Posting stored in memory");
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<Posting>, StoreError> {
        Ok(self
            .postings
            .iter()
            .map(|(id, fields)| Posting::new(*id, fields.clone()))
            .collect())
    }

    fn fetch_by_id(&self, id: PostingId) -> Result<Option<Posting>, StoreError> {
        Ok(self
            .postings
            .get(&id)
            .map(|fields| Posting::new(id, fields.clone())))
    }

    fn update_by_id(&mut self, id: PostingId, fields: &PostingFields) -> Result<(), StoreError> {
        let slot = self.postings.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = fields.clone();
        Ok(())
    }

    fn delete_by_id(&mut self, id: PostingId) -> Result<(), StoreError> {
        self.postings
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
