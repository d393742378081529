use crate::concurrent::ConcurrentAccumulator;
use crate::document::{Document, DocumentStatus, DocumentStore};
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::server::ExecutionPolicy;
use crate::DocId;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Results returned by one search.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
/// Relevances closer than this are ranked by rating instead.
pub const RELEVANCE_EPSILON: f64 = 1e-6;
/// Buckets of the accumulator used by parallel aggregation.
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// TF-IDF scoring over a read-only view of the index and document store.
pub struct Ranker<'a> {
    index: &'a InvertedIndex,
    documents: &'a DocumentStore,
}

impl<'a> Ranker<'a> {
    pub fn new(index: &'a InvertedIndex, documents: &'a DocumentStore) -> Self {
        Self { index, documents }
    }

    /// `ln(N / df)`, or `None` when no document contains `term`.
    pub fn inverse_document_frequency(&self, term: &str) -> Option<f64> {
        match self.index.document_frequency_count(term) {
            0 => None,
            df => Some((self.documents.len() as f64 / df as f64).ln()),
        }
    }

    /// Relevance of every document that matches an include term, passes
    /// `predicate` and carries no exclude term.
    pub fn aggregate<P>(&self, query: &Query<'_>, predicate: &P, policy: ExecutionPolicy) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        match policy {
            ExecutionPolicy::Sequential => self.aggregate_sequential(query, predicate),
            ExecutionPolicy::Parallel => self.aggregate_parallel(query, predicate),
        }
    }

    fn aggregate_sequential<P>(&self, query: &Query<'_>, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for term in &query.include_terms {
            self.for_each_weighted_posting(term, predicate, |id, weight| {
                *relevance.entry(id).or_insert(0.0) += weight;
            });
        }
        for term in &query.exclude_terms {
            if let Some(postings) = self.index.postings(term) {
                for id in postings.keys() {
                    relevance.remove(id);
                }
            }
        }
        relevance
    }

    fn aggregate_parallel<P>(&self, query: &Query<'_>, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let relevance: ConcurrentAccumulator<DocId, f64> = ConcurrentAccumulator::new(DEFAULT_SHARD_COUNT);
        query.include_terms.par_iter().for_each(|term| {
            self.for_each_weighted_posting(term, predicate, |id, weight| {
                *relevance.access(id) += weight;
            });
        });
        // Inclusion has fully joined here, so no task can re-add an erased id.
        query.exclude_terms.par_iter().for_each(|term| {
            if let Some(postings) = self.index.postings(term) {
                for &id in postings.keys() {
                    relevance.erase(id);
                }
            }
        });
        relevance.drain_to_ordered_map()
    }

    fn for_each_weighted_posting<P, F>(&self, term: &str, predicate: &P, mut add: F)
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
        F: FnMut(DocId, f64),
    {
        let Some(idf) = self.inverse_document_frequency(term) else {
            return;
        };
        let Some(postings) = self.index.postings(term) else {
            return;
        };
        for (&id, &tf) in postings.iter() {
            if let Some(data) = self.documents.get(id) {
                if predicate(id, data.status, data.rating) {
                    add(id, tf * idf);
                }
            }
        }
    }

    /// Aggregate, then attach ratings.
    pub fn find_all<P>(&self, query: &Query<'_>, predicate: &P, policy: ExecutionPolicy) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.aggregate(query, predicate, policy)
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.documents.get(id).map(|data| Document::new(id, relevance, data.rating))
            })
            .collect()
    }
}

/// Order by relevance descending; documents within [`RELEVANCE_EPSILON`] of
/// the most relevant member of their group tie and are ordered by rating
/// descending, then id.
pub fn sort_matches(matched: &mut [Document], policy: ExecutionPolicy) {
    let by_relevance = |a: &Document, b: &Document| {
        b.relevance.total_cmp(&a.relevance).then_with(|| a.id.cmp(&b.id))
    };
    match policy {
        ExecutionPolicy::Sequential => matched.sort_by(by_relevance),
        ExecutionPolicy::Parallel => matched.par_sort_by(by_relevance),
    }

    let mut start = 0;
    while start < matched.len() {
        let mut end = start + 1;
        while end < matched.len() && matched[start].relevance - matched[end].relevance < RELEVANCE_EPSILON {
            end += 1;
        }
        matched[start..end].sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        start = end;
    }
}

/// Sort and keep the first [`MAX_RESULT_DOCUMENT_COUNT`].
pub fn top_documents(mut matched: Vec<Document>, policy: ExecutionPolicy) -> Vec<Document> {
    sort_matches(&mut matched, policy);
    matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: DocId, relevance: f64, rating: i32) -> Document {
        Document::new(id, relevance, rating)
    }

    #[test]
    fn near_equal_relevance_ranks_by_rating() {
        let matched = vec![doc(1, 0.5, 1), doc(2, 0.5 + 5e-7, -2), doc(3, 0.5 - 3e-7, 9), doc(4, 0.9, 0)];
        let ids: Vec<DocId> = top_documents(matched, ExecutionPolicy::Sequential).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![4, 3, 1, 2]);
    }

    #[test]
    fn tie_group_does_not_chain_past_epsilon() {
        let matched = vec![doc(1, 1.0, 0), doc(2, 1.0 - 0.8e-6, 10), doc(3, 1.0 - 1.6e-6, 5)];
        let ids: Vec<DocId> = top_documents(matched, ExecutionPolicy::Sequential).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn relevance_gap_beats_rating() {
        let matched = vec![doc(1, 0.5, 100), doc(2, 0.5 + 2e-6, 0)];
        let ids: Vec<DocId> = top_documents(matched, ExecutionPolicy::Sequential).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn truncates_to_five() {
        let matched: Vec<Document> = (0..12).map(|i| doc(i, f64::from(i) * 0.1, 0)).collect();
        let top = top_documents(matched, ExecutionPolicy::Parallel);
        assert_eq!(top.len(), MAX_RESULT_DOCUMENT_COUNT);
        assert_eq!(top[0].id, 11);
        assert_eq!(top[4].id, 7);
    }

    #[test]
    fn idf_is_skipped_for_unseen_terms() {
        let mut index = InvertedIndex::new();
        let mut store = DocumentStore::new();
        for (id, words) in [(0, vec!["cat"]), (1, vec!["dog"])] {
            index.add_document(id, &words).unwrap();
            store
                .insert(id, crate::document::DocumentData { rating: 0, status: DocumentStatus::Actual })
                .unwrap();
        }
        let ranker = Ranker::new(&index, &store);
        assert_eq!(ranker.inverse_document_frequency("bird"), None);
        let idf = ranker.inverse_document_frequency("cat").unwrap();
        assert!((idf - 2f64.ln()).abs() < 1e-12);
    }
}
