use crate::server::SearchServer;
use crate::DocId;
use std::collections::{BTreeSet, HashSet};

/// Remove every document whose set of distinct terms repeats that of a
/// document with a lower id. Returns the removed ids in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let duplicates = find_duplicates(server);
    for &id in &duplicates {
        tracing::info!(doc_id = id, "found duplicate document");
        server.remove_document(id);
    }
    duplicates
}

/// Ids [`remove_duplicates`] would remove, without removing them.
pub fn find_duplicates(server: &SearchServer) -> Vec<DocId> {
    let mut seen: HashSet<&BTreeSet<String>> = HashSet::new();
    server
        .duplicate_signatures()
        .iter()
        .filter(|(_, signature)| !seen.insert(*signature))
        .map(|(&id, _)| id)
        .collect()
}
