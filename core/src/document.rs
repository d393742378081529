use crate::error::{Result, SearchError};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// One ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Integer mean truncated toward zero; zero for no ratings.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

/// Per-document metadata. Its key set is the canonical set of indexed ids.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<DocId, DocumentData>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects negative and already-present ids without touching the store.
    pub fn check_new_id(&self, id: DocId) -> Result<()> {
        if id < 0 {
            return Err(SearchError::negative_id(id));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::duplicate_id(id));
        }
        Ok(())
    }

    pub fn insert(&mut self, id: DocId, data: DocumentData) -> Result<()> {
        self.check_new_id(id)?;
        self.documents.insert(id, data);
        Ok(())
    }

    pub fn remove(&mut self, id: DocId) -> Option<DocumentData> {
        self.documents.remove(&id)
    }

    pub fn get(&self, id: DocId) -> Option<&DocumentData> {
        self.documents.get(&id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.documents.keys().copied()
    }
}
