use crate::document::{average_rating, Document, DocumentData, DocumentStatus, DocumentStore};
use crate::error::{Result, SearchError};
use crate::index::{InvertedIndex, TermFrequencies};
use crate::query::{Query, QueryParser};
use crate::ranking::{top_documents, Ranker};
use crate::tokenizer::{split_into_valid_words, StopWordSet};
use crate::DocId;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Where per-term work runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Everything on the calling thread.
    #[default]
    Sequential,
    /// One rayon task per term.
    Parallel,
}

/// Facade over the index, document store and ranking.
///
/// Mutating calls take `&mut self`; searches take `&self` and may run from
/// many threads at once.
#[derive(Debug, Default)]
pub struct SearchServer {
    stop_words: StopWordSet,
    index: InvertedIndex,
    documents: DocumentStore,
}

impl SearchServer {
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_stop_words(StopWordSet::new(stop_words)?))
    }

    /// Stop words given as one space-separated line.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::with_stop_words(StopWordSet::from_text(text)?))
    }

    pub fn with_stop_words(stop_words: StopWordSet) -> Self {
        Self { stop_words, index: InvertedIndex::new(), documents: DocumentStore::new() }
    }

    pub fn stop_words(&self) -> &StopWordSet {
        &self.stop_words
    }

    /// Index a document. Either the whole document is indexed or nothing changes.
    pub fn add_document(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        self.documents.check_new_id(id)?;
        let words: Vec<&str> = split_into_valid_words(text)?
            .into_iter()
            .filter(|word| !self.stop_words.contains(word))
            .collect();

        self.index.add_document(id, &words)?;
        let rating = average_rating(ratings);
        self.documents.insert(id, DocumentData { rating, status })?;
        tracing::debug!(doc_id = id, terms = words.len(), rating, ?status, "document added");
        Ok(())
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, move |_, document_status, _| document_status == status)
    }

    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_with_policy<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = self.parser().parse(raw_query)?;
        let matched = Ranker::new(&self.index, &self.documents).find_all(&query, &predicate, policy);
        Ok(top_documents(matched, policy))
    }

    /// Include terms of `raw_query` found in document `id`, sorted, plus its
    /// status. Any exclude term found in the document empties the term list.
    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with_policy(ExecutionPolicy::Sequential, raw_query, id)
    }

    pub fn match_document_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let status = self.documents.get(id).ok_or(SearchError::UnknownDocument(id))?.status;
        let parser = self.parser();
        let in_document = |term: &&str| self.index.contains_term_in(term, id);

        let matched: Vec<&str> = match policy {
            ExecutionPolicy::Sequential => {
                let query = parser.parse(raw_query)?;
                if query.exclude_terms.iter().any(in_document) {
                    return Ok((Vec::new(), status));
                }
                query.include_terms.into_iter().filter(in_document).collect()
            }
            ExecutionPolicy::Parallel => {
                let Query { include_terms, exclude_terms } = parser.parse_unsorted(raw_query)?;
                if exclude_terms.par_iter().any(in_document) {
                    return Ok((Vec::new(), status));
                }
                let mut matched: Vec<&str> = include_terms.into_par_iter().filter(in_document).collect();
                matched.par_sort_unstable();
                matched.dedup();
                matched
            }
        };
        Ok((matched.into_iter().map(str::to_string).collect(), status))
    }

    /// Remove a document sequentially; unknown ids are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_with_policy(ExecutionPolicy::Sequential, id);
    }

    pub fn remove_document_with_policy(&mut self, policy: ExecutionPolicy, id: DocId) {
        if self.documents.remove(id).is_none() {
            return;
        }
        self.index.remove_document(id, policy);
        tracing::debug!(doc_id = id, ?policy, "document removed");
    }

    /// Term frequencies of a document; empty for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> TermFrequencies {
        self.index.document_term_frequencies(id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Document ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.documents.ids()
    }

    /// Distinct indexed terms of every document, keyed by id.
    pub fn duplicate_signatures(&self) -> &BTreeMap<DocId, BTreeSet<String>> {
        self.index.signatures()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    fn parser(&self) -> QueryParser<'_> {
        QueryParser::new(&self.stop_words)
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = Box<dyn Iterator<Item = DocId> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
