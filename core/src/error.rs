use crate::DocId;

/// Why a document id was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentIdProblem {
    Negative,
    Duplicate,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid document id {id}: {reason:?}")]
    InvalidDocument { id: DocId, reason: DocumentIdProblem },
    /// A term contains a character below 0x20.
    #[error("word {term:?} contains control characters")]
    InvalidTerm { term: String },
    #[error("query word {word:?} is malformed")]
    MalformedQuery { word: String },
    #[error("document {0} is not indexed")]
    UnknownDocument(DocId),
}

impl SearchError {
    pub(crate) fn negative_id(id: DocId) -> Self {
        SearchError::InvalidDocument { id, reason: DocumentIdProblem::Negative }
    }

    pub(crate) fn duplicate_id(id: DocId) -> Self {
        SearchError::InvalidDocument { id, reason: DocumentIdProblem::Duplicate }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
