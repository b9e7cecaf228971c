//! Query and write latency benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use vecstash::storage::local::{LocalStorage, LocalStorageConfig};
use vecstash::{BatchItem, Metadata, VectorStore, WordVectors};

const DIMS: usize = 64;

fn random_vector(dims: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..dims).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect()
}

const VOCABULARY: usize = 200;

fn word_table() -> WordVectors {
    let mut table = String::new();
    for word in 0..VOCABULARY {
        let values: Vec<String> = random_vector(DIMS).iter().map(|x| x.to_string()).collect();
        table.push_str(&format!("w{} {}\n", word, values.join(" ")));
    }
    WordVectors::parse(&table).unwrap()
}

fn random_text(words: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..words)
        .map(|_| format!("w{}", rng.gen_range(0..VOCABULARY)))
        .collect::<Vec<_>>()
        .join(" ")
}

async fn populated_store(dir: &tempfile::TempDir, records: usize) -> VectorStore {
    let storage = Arc::new(LocalStorage::new(dir.path(), LocalStorageConfig::fast()).unwrap());
    let store = VectorStore::open(Arc::new(word_table()), storage, "bench.json")
        .await
        .unwrap();

    // One snapshot write for the whole load
    let items: Vec<_> = (0..records)
        .map(|i| BatchItem::new(format!("doc-{i}"), random_text(5)))
        .collect();
    store.batch_upsert_texts(items).await.unwrap();
    store
}

fn bench_query(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("query");

    for records in [100usize, 1_000, 5_000] {
        let dir = tempfile::tempdir().unwrap();
        let store = rt.block_on(populated_store(&dir, records));
        let query = random_vector(DIMS);

        group.bench_with_input(BenchmarkId::new("top_10", records), &records, |b, _| {
            b.to_async(&rt)
                .iter(|| async { black_box(store.query(&query, 10).await) })
        });
    }

    group.finish();
}

fn bench_query_text(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = rt.block_on(populated_store(&dir, 1_000));

    c.bench_function("query_text_1000", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(store.query_text("w1 w2 w3", 10).await) })
    });
}

fn bench_upsert(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("upsert");
    group.sample_size(20);

    // Each write rewrites the whole snapshot
    for records in [100usize, 1_000] {
        let dir = tempfile::tempdir().unwrap();
        let store = rt.block_on(populated_store(&dir, records));
        let mut counter = 0u64;

        group.bench_with_input(BenchmarkId::new("single", records), &records, |b, _| {
            b.iter(|| {
                counter += 1;
                rt.block_on(store.upsert(
                    format!("new-{counter}"),
                    random_vector(DIMS),
                    "",
                    Metadata::new(),
                ))
                .unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query, bench_query_text, bench_upsert);
criterion_main!(benches);
