use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWordSet};

/// Parsed query. Terms borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub include_terms: Vec<&'q str>,
    pub exclude_terms: Vec<&'q str>,
}

impl Query<'_> {
    pub fn is_empty(&self) -> bool {
        self.include_terms.is_empty() && self.exclude_terms.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct QueryWord<'q> {
    data: &'q str,
    is_exclude: bool,
    is_stop: bool,
}

pub struct QueryParser<'s> {
    stop_words: &'s StopWordSet,
}

impl<'s> QueryParser<'s> {
    pub fn new(stop_words: &'s StopWordSet) -> Self {
        Self { stop_words }
    }

    /// Parse with both term lists sorted and deduplicated.
    pub fn parse<'q>(&self, text: &'q str) -> Result<Query<'q>> {
        let mut query = self.parse_unsorted(text)?;
        for terms in [&mut query.include_terms, &mut query.exclude_terms] {
            terms.sort_unstable();
            terms.dedup();
        }
        tracing::trace!(include = ?query.include_terms, exclude = ?query.exclude_terms, "parsed query");
        Ok(query)
    }

    /// Parse keeping the order and repetitions of the raw text.
    pub fn parse_unsorted<'q>(&self, text: &'q str) -> Result<Query<'q>> {
        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = self.parse_word(token)?;
            if word.is_stop {
                continue;
            }
            if word.is_exclude {
                query.exclude_terms.push(word.data);
            } else {
                query.include_terms.push(word.data);
            }
        }
        Ok(query)
    }

    fn parse_word<'q>(&self, token: &'q str) -> Result<QueryWord<'q>> {
        let (data, is_exclude) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if is_exclude {
            if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
                return Err(SearchError::MalformedQuery { word: token.to_string() });
            }
        } else if !is_valid_word(data) {
            return Err(SearchError::InvalidTerm { term: token.to_string() });
        }
        Ok(QueryWord { data, is_exclude, is_stop: self.stop_words.contains(data) })
    }
}
