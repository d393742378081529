use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::server::SearchServer;
use crate::DocId;
use std::collections::VecDeque;

/// Requests remembered by the window: one day of per-minute requests.
pub const REQUEST_WINDOW: usize = 1440;

/// Forwards searches to a [`SearchServer`] and keeps the result sizes of the
/// last [`REQUEST_WINDOW`] requests.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    result_counts: VecDeque<usize>,
    window: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self::with_window(server, REQUEST_WINDOW)
    }

    pub fn with_window(server: &'a SearchServer, window: usize) -> Self {
        Self { server, result_counts: VecDeque::with_capacity(window.min(REQUEST_WINDOW)), window }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let found = self.server.find_top_documents(raw_query)?;
        self.record(found.len());
        Ok(found)
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        let found = self.server.find_top_documents_by_status(raw_query, status)?;
        self.record(found.len());
        Ok(found)
    }

    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let found = self.server.find_top_documents_by(raw_query, predicate)?;
        self.record(found.len());
        Ok(found)
    }

    /// Requests in the window that found nothing.
    pub fn no_result_requests(&self) -> usize {
        self.result_counts.iter().filter(|&&count| count == 0).count()
    }

    pub fn len(&self) -> usize {
        self.result_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result_counts.is_empty()
    }

    fn record(&mut self, count: usize) {
        if self.window == 0 {
            return;
        }
        if self.result_counts.len() == self.window {
            self.result_counts.pop_front();
        }
        self.result_counts.push_back(count);
    }
}
