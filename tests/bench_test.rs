//! Benchmark tests for the registry hot paths
//!
//! Run with: cargo test --release bench -- --ignored --nocapture

use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

use linkreg::database::RedbStore;
use linkreg::model::CreateRequest;
use linkreg::registry::LinkRegistry;
use linkreg::store::{LinkStore, MemoryStore};

fn report(name: &str, iterations: usize, duration: Duration) {
    let avg_ms = duration.as_secs_f64() * 1000.0 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

fn redb_registry() -> (LinkRegistry, NamedTempFile) {
    let temp_db = NamedTempFile::new().unwrap();
    let store = RedbStore::open(temp_db.path().to_str().unwrap()).unwrap();
    (LinkRegistry::new(Arc::new(store)), temp_db)
}

async fn bench_creates(name: &str, registry: &LinkRegistry, iterations: usize) {
    let start = Instant::now();
    for i in 0..iterations {
        registry
            .create(CreateRequest::new(format!("https://example.com/bench{i}"), None))
            .await
            .unwrap();
    }
    report(name, iterations, start.elapsed());
}

#[tokio::test]
#[ignore] // Run explicitly with: cargo test bench --release -- --ignored --nocapture
async fn bench_create_links() {
    println!("\n=== Benchmark: Create Links ===\n");

    let (registry, _temp_db) = redb_registry();
    bench_creates("Create with generated code (redb)", &registry, 1000).await;

    let memory: Arc<dyn LinkStore> = Arc::new(MemoryStore::new());
    bench_creates("Create with generated code (memory)", &LinkRegistry::new(memory), 1000).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn bench_concurrent_redirects() {
    println!("\n=== Benchmark: Concurrent Redirects ===\n");

    let (registry, _temp_db) = redb_registry();
    registry
        .create(CreateRequest::new("https://example.com/hot", Some("bench01".into())))
        .await
        .unwrap();

    let num_tasks = 100;
    let ops_per_task = 10;

    let start = Instant::now();
    let handles: Vec<_> = (0..num_tasks)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move {
                for _ in 0..ops_per_task {
                    registry.redirect("bench01").await.unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }
    let total_ops = num_tasks * ops_per_task;
    report("Redirect one hot code", total_ops, start.elapsed());

    let link = registry.get_by_code("bench01").await.unwrap();
    assert_eq!(link.click_count, total_ops as u64);
}

#[tokio::test]
#[ignore]
async fn bench_list_scaling() {
    println!("\n=== Benchmark: List Scaling ===\n");

    let (registry, _temp_db) = redb_registry();
    let mut filled = 0;

    for &size in &[100, 1000, 10000] {
        while filled < size {
            registry
                .create(CreateRequest::new(format!("https://example.com/scale{filled}"), None))
                .await
                .unwrap();
            filled += 1;
        }

        let start = Instant::now();
        let links = registry.list_all().await.unwrap();
        println!("  {} links listed in {:?}", links.len(), start.elapsed());
    }
    println!();
}
