//! In-process full-text search over bag-of-words documents.
//!
//! Documents are indexed as term frequencies, queries carry inclusion and
//! `-`exclusion terms, and matches are ranked by TF-IDF with a fixed top-5 cut.
//! Ranking and removal can run sequentially or fan out over rayon per term.

pub mod batch;
pub mod concurrent;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod ranking;
pub mod request_queue;
pub mod server;
pub mod tokenizer;

pub use concurrent::ConcurrentAccumulator;
pub use document::{Document, DocumentStatus};
pub use error::{DocumentIdProblem, Result, SearchError};
pub use index::InvertedIndex;
pub use query::Query;
pub use ranking::{MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
pub use request_queue::RequestQueue;
pub use server::{ExecutionPolicy, SearchServer};
pub use tokenizer::StopWordSet;

pub type DocId = i32;
