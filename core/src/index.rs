use crate::error::{Result, SearchError};
use crate::server::ExecutionPolicy;
use crate::DocId;
use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// docId -> term frequency for one term.
pub type Postings = BTreeMap<DocId, f64>;
/// term -> term frequency for one document.
pub type TermFrequencies = BTreeMap<String, f64>;

/// Forward (term -> postings) and reverse (document -> terms) maps kept in step.
///
/// The forward map is sharded by term so that removal can erase one document
/// from many posting lists concurrently. Both maps are private and change only
/// through [`InvertedIndex::add_document`] and [`InvertedIndex::remove_document`].
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_to_documents: DashMap<String, Postings>,
    document_to_words: BTreeMap<DocId, TermFrequencies>,
    signatures: BTreeMap<DocId, BTreeSet<String>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `terms` (stop words already removed) for a new document.
    /// Each occurrence contributes `1 / terms.len()` to its term's frequency.
    pub fn add_document(&mut self, id: DocId, terms: &[&str]) -> Result<()> {
        if id < 0 {
            return Err(SearchError::negative_id(id));
        }
        if self.document_to_words.contains_key(&id) {
            return Err(SearchError::duplicate_id(id));
        }

        let mut frequencies = TermFrequencies::new();
        if !terms.is_empty() {
            let inv_word_count = 1.0 / terms.len() as f64;
            for &term in terms {
                *frequencies.entry(term.to_string()).or_insert(0.0) += inv_word_count;
            }
        }
        for (term, &tf) in &frequencies {
            self.word_to_documents
                .entry(term.clone())
                .or_default()
                .insert(id, tf);
        }
        self.signatures.insert(id, frequencies.keys().cloned().collect());
        self.document_to_words.insert(id, frequencies);
        Ok(())
    }

    /// Drop every posting of `id`. Returns false when `id` was not indexed.
    pub fn remove_document(&mut self, id: DocId, policy: ExecutionPolicy) -> bool {
        let Some(words) = self.document_to_words.remove(&id) else {
            return false;
        };
        self.signatures.remove(&id);

        let forward = &self.word_to_documents;
        match policy {
            ExecutionPolicy::Sequential => {
                for term in words.keys() {
                    erase_posting(forward, term, id);
                }
            }
            ExecutionPolicy::Parallel => {
                words.par_iter().for_each(|(term, _)| erase_posting(forward, term, id));
            }
        }
        true
    }

    /// Borrowed postings of `term`, if any document contains it.
    pub fn postings(&self, term: &str) -> Option<Ref<'_, String, Postings>> {
        self.word_to_documents.get(term)
    }

    /// Owned copy of the postings of `term`; empty when the term is unseen.
    pub fn term_document_frequencies(&self, term: &str) -> Postings {
        self.postings(term).map(|p| p.value().clone()).unwrap_or_default()
    }

    pub fn document_frequency_count(&self, term: &str) -> usize {
        self.postings(term).map_or(0, |p| p.len())
    }

    pub fn document_terms(&self, id: DocId) -> Option<&TermFrequencies> {
        self.document_to_words.get(&id)
    }

    /// Owned copy of a document's term frequencies; empty for an unknown id.
    pub fn document_term_frequencies(&self, id: DocId) -> TermFrequencies {
        self.document_terms(id).cloned().unwrap_or_default()
    }

    pub fn contains_term_in(&self, term: &str, id: DocId) -> bool {
        self.document_terms(id).is_some_and(|words| words.contains_key(term))
    }

    pub fn signatures(&self) -> &BTreeMap<DocId, BTreeSet<String>> {
        &self.signatures
    }

    pub fn term_count(&self) -> usize {
        self.word_to_documents.len()
    }

    /// Every (term, doc, tf) triple of one map is present in the other.
    #[doc(hidden)]
    pub fn is_consistent(&self) -> bool {
        let forward_ok = self.word_to_documents.iter().all(|entry| {
            !entry.value().is_empty()
                && entry.value().iter().all(|(id, tf)| {
                    self.document_to_words
                        .get(id)
                        .and_then(|words| words.get(entry.key()))
                        == Some(tf)
                })
        });
        let reverse_ok = self.document_to_words.iter().all(|(id, words)| {
            words.iter().all(|(term, tf)| {
                self.postings(term).and_then(|p| p.get(id).copied()) == Some(*tf)
            })
        });
        forward_ok && reverse_ok
    }
}

fn erase_posting(forward: &DashMap<String, Postings>, term: &str, id: DocId) {
    if let Some(mut postings) = forward.get_mut(term) {
        postings.remove(&id);
    }
    forward.remove_if(term, |_, postings| postings.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_terms_accumulate_frequency() {
        let mut index = InvertedIndex::new();
        index.add_document(0, &["a", "b", "a"]).unwrap();
        let freqs = index.document_term_frequencies(0);
        assert!((freqs["a"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((freqs["b"] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(index.document_frequency_count("a"), 1);
        assert!(index.is_consistent());
    }

    #[test]
    fn unknown_lookups_are_empty() {
        let index = InvertedIndex::new();
        assert!(index.term_document_frequencies("ghost").is_empty());
        assert!(index.document_term_frequencies(42).is_empty());
        assert_eq!(index.document_frequency_count("ghost"), 0);
    }

    #[test]
    fn duplicate_and_negative_ids_leave_index_untouched() {
        let mut index = InvertedIndex::new();
        index.add_document(1, &["cat"]).unwrap();
        assert!(index.add_document(1, &["dog"]).is_err());
        assert!(index.add_document(-5, &["dog"]).is_err());
        assert_eq!(index.term_count(), 1);
        assert_eq!(index.document_frequency_count("dog"), 0);
    }

    #[test]
    fn removal_clears_both_directions() {
        for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
            let mut index = InvertedIndex::new();
            index.add_document(0, &["cat", "dog", "bird"]).unwrap();
            index.add_document(1, &["dog"]).unwrap();
            assert!(index.remove_document(0, policy));
            assert!(!index.remove_document(0, policy));
            assert!(index.document_terms(0).is_none());
            assert!(index.signatures().get(&0).is_none());
            assert_eq!(index.document_frequency_count("cat"), 0);
            assert_eq!(index.document_frequency_count("dog"), 1);
            assert_eq!(index.term_count(), 1);
            assert!(index.is_consistent());
        }
    }

    #[test]
    fn empty_document_is_indexed_without_postings() {
        let mut index = InvertedIndex::new();
        index.add_document(7, &[]).unwrap();
        assert!(index.document_terms(7).is_some_and(|w| w.is_empty()));
        assert_eq!(index.term_count(), 0);
        assert!(index.remove_document(7, ExecutionPolicy::Sequential));
    }
}
