use crate::document::Document;
use crate::error::Result;
use crate::server::SearchServer;
use rayon::prelude::*;

/// Run every query through [`SearchServer::find_top_documents`] in parallel.
/// Output order follows `queries`.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Vec<Result<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| server.find_top_documents(query.as_ref()))
        .collect()
}

/// Flatten [`process_queries`] into one list, stopping at the first failed query.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    let mut joined = Vec::new();
    for found in process_queries(server, queries) {
        joined.extend(found?);
    }
    Ok(joined)
}
