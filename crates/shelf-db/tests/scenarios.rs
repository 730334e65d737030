//! End-to-end service scenarios.

use std::sync::Arc;

use shelf_db::prelude::*;
use shelf_index::IndexError;
use uuid::Uuid;

fn service() -> VectorService {
    VectorService::new(Arc::new(LetterCountEmbedder))
}

/// Service with a pinned LSH seed so bucketing is reproducible.
fn seeded_service() -> VectorService {
    VectorService::with_config(
        Arc::new(LetterCountEmbedder),
        ServiceConfig {
            lsh: LshParams {
                planes: 12,
                seed: Some(42),
            },
        },
    )
}

#[tokio::test]
async fn round_trip_add_build_query() {
    let svc = service();
    let lib = svc.create_library("demo").await;
    let chunk = svc.add_chunk(lib.id, "hello vector world").await.unwrap();
    svc.build_index(lib.id, "linear").await.unwrap();

    let hits = svc.query(lib.id, &[1.0; 26], 5).await.unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().any(|c| c.id == chunk.id));
}

#[tokio::test]
async fn delete_library_cascades() {
    let svc = service();
    let lib = svc.create_library("doomed").await;
    let mut chunk_ids = Vec::new();
    for text in ["alpha", "beta", "gamma"] {
        chunk_ids.push(svc.add_chunk(lib.id, text).await.unwrap().id);
    }
    svc.build_index(lib.id, "linear").await.unwrap();

    svc.delete_library(lib.id).await.unwrap();

    assert!(svc.list_libraries().await.is_empty());
    assert!(svc.index_kind(lib.id).await.is_none());
    for id in chunk_ids {
        assert!(matches!(
            svc.get_chunk(id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
    assert!(matches!(
        svc.delete_library(lib.id).await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn every_algorithm_finds_the_query_chunk() {
    let svc = seeded_service();
    let lib = svc.create_library("parity").await;
    let mut chunks = Vec::new();
    for i in 0..20 {
        // Distinct, deterministic texts: the trailing run makes every
        // letter-count embedding unique and non-proportional.
        let text = format!("chunk number {} carries payload {}", i, "x".repeat(i + 1));
        chunks.push(svc.add_chunk(lib.id, text).await.unwrap());
    }
    let target = &chunks[7];

    for algo in ["linear", "kd"] {
        svc.build_index(lib.id, algo).await.unwrap();
        let hits = svc.query(lib.id, &target.embedding, 1).await.unwrap();
        assert_eq!(hits[0].id, target.id, "algorithm {algo}");
    }

    // LSH is approximate, but the query here is the target's own
    // embedding, which always hashes into the target's bucket.
    svc.build_index(lib.id, "lsh").await.unwrap();
    let hits = svc.query(lib.id, &target.embedding, 1).await.unwrap();
    assert_eq!(hits[0].id, target.id);
}

#[tokio::test]
async fn query_before_build_is_not_indexed() {
    let svc = service();
    let lib = svc.create_library("raw").await;
    svc.add_chunk(lib.id, "some text").await.unwrap();

    assert!(matches!(
        svc.query(lib.id, &[1.0; 26], 3).await,
        Err(ServiceError::NotIndexed(id)) if id == lib.id
    ));
}

#[tokio::test]
async fn query_with_wrong_dimension_is_rejected() {
    let svc = service();
    let lib = svc.create_library("dims").await;
    svc.add_chunk(lib.id, "hello").await.unwrap();
    svc.build_index(lib.id, "linear").await.unwrap();

    let err = svc.query(lib.id, &[1.0; 10], 3).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Index(IndexError::DimensionMismatch {
            expected: 26,
            actual: 10
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_and_lists_stay_consistent() {
    let svc = Arc::new(service());
    let lib = svc.create_library("busy").await;

    let mut tasks = Vec::new();
    for i in 0..50 {
        let writer = Arc::clone(&svc);
        tasks.push(tokio::spawn(async move {
            writer
                .add_chunk(lib.id, format!("entry number {i}"))
                .await
                .unwrap();
        }));

        let reader = Arc::clone(&svc);
        tasks.push(tokio::spawn(async move {
            // A listed chunk is a saved chunk: text and embedding always
            // arrive together, never a half-written entry.
            for chunk in reader.list_chunks(lib.id).await {
                assert_eq!(chunk.embedding.len(), 26);
                assert!(!chunk.text.is_empty());
            }
        }));
    }
    for result in futures::future::join_all(tasks).await {
        result.unwrap();
    }

    assert_eq!(svc.list_chunks(lib.id).await.len(), 50);
    // One synthetic document per chunk.
    assert_eq!(svc.get_library(lib.id).await.unwrap().documents.len(), 50);
}

#[tokio::test]
async fn rebuild_replaces_the_installed_index() {
    let svc = service();
    let lib = svc.create_library("rebuild").await;
    svc.add_chunk(lib.id, "payload").await.unwrap();

    svc.build_index(lib.id, "linear").await.unwrap();
    assert_eq!(svc.index_kind(lib.id).await, Some(IndexKind::Linear));

    svc.build_index(lib.id, "kd").await.unwrap();
    assert_eq!(svc.index_kind(lib.id).await, Some(IndexKind::KdTree));
}

#[tokio::test]
async fn unknown_algorithm_is_rejected() {
    let svc = service();
    let lib = svc.create_library("algo").await;
    assert!(matches!(
        svc.build_index(lib.id, "hnsw").await,
        Err(ServiceError::InvalidAlgo(name)) if name == "hnsw"
    ));
}

#[tokio::test]
async fn build_on_a_missing_library_is_not_found() {
    let svc = service();
    assert!(matches!(
        svc.build_index(Uuid::new_v4(), "linear").await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn stale_ids_are_dropped_from_query_results() {
    let svc = service();
    let lib = svc.create_library("stale").await;
    let keep_a = svc.add_chunk(lib.id, "aardvark").await.unwrap();
    let doomed = svc.add_chunk(lib.id, "badger").await.unwrap();
    let keep_b = svc.add_chunk(lib.id, "cormorant").await.unwrap();
    svc.build_index(lib.id, "linear").await.unwrap();

    svc.delete_chunk(doomed.id).await.unwrap();

    let hits = svc.query(lib.id, &[1.0; 26], 5).await.unwrap();
    let ids: Vec<Uuid> = hits.iter().map(|c| c.id).collect();
    assert_eq!(hits.len(), 2);
    assert!(ids.contains(&keep_a.id));
    assert!(ids.contains(&keep_b.id));
    assert!(!ids.contains(&doomed.id));
}

#[tokio::test]
async fn update_chunk_recomputes_the_embedding() {
    let svc = service();
    let lib = svc.create_library("edits").await;
    let chunk = svc.add_chunk(lib.id, "aaa").await.unwrap();
    assert_eq!(chunk.embedding[0], 3.0);

    let updated = svc.update_chunk(chunk.id, "zzzz").await.unwrap();
    assert_eq!(updated.id, chunk.id);
    assert_eq!(updated.embedding[0], 0.0);
    assert_eq!(updated.embedding[25], 4.0);

    // The stored copy changed too.
    let fetched = svc.get_chunk(chunk.id).await.unwrap();
    assert_eq!(fetched.text, "zzzz");
    assert_eq!(fetched.embedding[25], 4.0);
}

#[tokio::test]
async fn update_library_renames_in_place() {
    let svc = service();
    let lib = svc.create_library("draft").await;
    svc.add_chunk(lib.id, "content").await.unwrap();

    let renamed = svc.update_library(lib.id, "final").await.unwrap();
    assert_eq!(renamed.id, lib.id);
    assert_eq!(renamed.name, "final");
    assert_eq!(renamed.created_at, lib.created_at);
    assert_eq!(renamed.documents.len(), 1);

    assert!(matches!(
        svc.update_library(Uuid::new_v4(), "nope").await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn empty_text_embeds_to_a_queryable_zero_vector() {
    let svc = service();
    let lib = svc.create_library("degenerate").await;
    let chunk = svc.add_chunk(lib.id, "").await.unwrap();
    assert!(chunk.embedding.iter().all(|&c| c == 0.0));

    svc.build_index(lib.id, "linear").await.unwrap();
    let hits = svc.query(lib.id, &[1.0; 26], 1).await.unwrap();
    // Similarity against the zero vector is finite (epsilon guard), so the
    // chunk still ranks.
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, chunk.id);
}

#[tokio::test]
async fn an_indexed_empty_library_answers_with_nothing() {
    let svc = service();
    let lib = svc.create_library("empty").await;
    svc.build_index(lib.id, "linear").await.unwrap();

    // No dimension to disagree with: an empty index accepts any query.
    let hits = svc.query(lib.id, &[1.0; 26], 5).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn add_chunk_to_a_missing_library_is_not_found() {
    let svc = service();
    assert!(matches!(
        svc.add_chunk(Uuid::new_v4(), "orphan").await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn chunks_reachable_through_a_library_resolve_globally() {
    let svc = service();
    let lib = svc.create_library("reachable").await;
    for text in ["one", "two", "three"] {
        svc.add_chunk(lib.id, text).await.unwrap();
    }

    for chunk in svc.list_chunks(lib.id).await {
        let fetched = svc.get_chunk(chunk.id).await.unwrap();
        assert_eq!(fetched.text, chunk.text);
    }
}
