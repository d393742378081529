use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use termsift::{DocumentStatus, ExecutionPolicy, SearchServer};

const WORDS: [&str; 16] = [
    "cat", "dog", "bird", "fluffy", "white", "tail", "collar", "curly", "nasty", "rat", "funny", "pet", "hair",
    "big", "small", "city",
];

fn build_server(documents: i32) -> SearchServer {
    let mut server = SearchServer::from_stop_words_text("and with in").unwrap();
    for id in 0..documents {
        let text: Vec<&str> = (0..24).map(|i| WORDS[((id * 31 + i * 17) % 16) as usize]).collect();
        server.add_document(id, &text.join(" "), DocumentStatus::Actual, &[id % 10]).unwrap();
    }
    server
}

fn bench_find_top_documents(c: &mut Criterion) {
    let server = build_server(20_000);
    let query = "cat dog fluffy white tail curly -nasty -rat";
    let mut group = c.benchmark_group("find_top_documents");
    for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{policy:?}")), &policy, |b, &policy| {
            b.iter(|| server.find_top_documents_with_policy(policy, query, |_, status, _| status == DocumentStatus::Actual))
        });
    }
    group.finish();
}

fn bench_remove_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_document");
    for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
        group.bench_function(BenchmarkId::from_parameter(format!("{policy:?}")), |b| {
            b.iter_batched(
                || build_server(2_000),
                |mut server| {
                    for id in 0..200 {
                        server.remove_document_with_policy(policy, id);
                    }
                    server
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_top_documents, bench_remove_document);
criterion_main!(benches);
