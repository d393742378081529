use termsift::{DocumentStatus, ExecutionPolicy, SearchServer};

const WORDS: [&str; 12] = [
    "cat", "dog", "bird", "fluffy", "white", "tail", "collar", "curly", "nasty", "rat", "funny", "pet",
];

/// Deterministic pseudo-random corpus.
fn corpus(documents: i32) -> SearchServer {
    let mut server = SearchServer::from_stop_words_text("and with").unwrap();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for id in 0..documents {
        let mut text = Vec::new();
        let len = 3 + (id % 7) as usize;
        for _ in 0..len {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            text.push(WORDS[(seed % WORDS.len() as u64) as usize]);
        }
        let status = if id % 5 == 0 { DocumentStatus::Banned } else { DocumentStatus::Actual };
        let ratings = [id % 9, (id * 7) % 11 - 5];
        server.add_document(id, &text.join(" "), status, &ratings).unwrap();
    }
    server
}

#[test]
fn parallel_ranking_matches_sequential() {
    let server = corpus(400);
    let queries = [
        "cat dog -bird",
        "fluffy white tail",
        "curly -nasty -rat pet",
        "funny pet rat",
        "collar",
        "-cat",
        "unknown words only",
    ];
    let actual = |_: i32, status: DocumentStatus, _: i32| status == DocumentStatus::Actual;
    for query in queries {
        let seq = server.find_top_documents_with_policy(ExecutionPolicy::Sequential, query, actual).unwrap();
        let par = server.find_top_documents_with_policy(ExecutionPolicy::Parallel, query, actual).unwrap();
        assert_eq!(seq.len(), par.len(), "{query}");
        for (s, p) in seq.iter().zip(&par) {
            assert_eq!(s.id, p.id, "{query}");
            assert_eq!(s.rating, p.rating);
            assert!((s.relevance - p.relevance).abs() < 1e-9, "{query}");
        }
    }
}

#[test]
fn parallel_exclusion_drops_documents() {
    let server = corpus(200);
    let found = server
        .find_top_documents_with_policy(ExecutionPolicy::Parallel, "cat -dog", |_, _, _| true)
        .unwrap();
    for document in found {
        let (terms, _) = server.match_document("dog", document.id).unwrap();
        assert!(terms.is_empty(), "document {} contains an excluded term", document.id);
    }
}

#[test]
fn parallel_match_equals_sequential() {
    let server = corpus(60);
    let query = "cat cat fluffy white pet -rat tail dog";
    for id in &server {
        let seq = server.match_document_with_policy(ExecutionPolicy::Sequential, query, id).unwrap();
        let par = server.match_document_with_policy(ExecutionPolicy::Parallel, query, id).unwrap();
        assert_eq!(seq, par, "document {id}");
    }
}

#[test]
fn parallel_removal_keeps_index_consistent() {
    let mut seq = corpus(150);
    let mut par = corpus(150);
    for id in (0..150).step_by(3) {
        seq.remove_document_with_policy(ExecutionPolicy::Sequential, id);
        par.remove_document_with_policy(ExecutionPolicy::Parallel, id);
    }
    assert!(par.index().is_consistent());
    assert_eq!(seq.document_count(), 100);
    assert_eq!(par.document_count(), 100);
    assert_eq!(seq.index().term_count(), par.index().term_count());
    for id in &par {
        assert_eq!(seq.word_frequencies(id), par.word_frequencies(id));
    }
    assert_eq!(
        seq.find_top_documents("cat dog").unwrap().iter().map(|d| d.id).collect::<Vec<_>>(),
        par.find_top_documents("cat dog").unwrap().iter().map(|d| d.id).collect::<Vec<_>>()
    );
}

#[test]
fn searches_run_concurrently_on_a_shared_server() {
    let server = corpus(300);
    let expected = server.find_top_documents("fluffy cat").unwrap();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..20 {
                    let found = server
                        .find_top_documents_with_policy(ExecutionPolicy::Parallel, "fluffy cat", |_, st, _| {
                            st == DocumentStatus::Actual
                        })
                        .unwrap();
                    let ids: Vec<_> = found.iter().map(|d| d.id).collect();
                    let expected_ids: Vec<_> = expected.iter().map(|d| d.id).collect();
                    assert_eq!(ids, expected_ids);
                }
            });
        }
    });
}
