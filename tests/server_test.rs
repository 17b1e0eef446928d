use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use minidic::dictionary::StoreConfig;
use minidic::query::QueryService;
use minidic::server::{ServerState, reply};
use minidic::storage::memory::{MemoryStorage, MemoryStorageConfig};

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn state_with(storage: Arc<MemoryStorage>) -> ServerState {
    let service = QueryService::from_storage(storage, StoreConfig::default());
    ServerState::new(service, false)
}

#[tokio::test]
async fn test_protocol_round() {
    let storage = Arc::new(MemoryStorage::new_default());
    storage.put("f.csv", "apple\tfruit\nbanana\tfruit\ncherry\tfruit\n");
    let state = state_with(storage);

    let listing = reply(&state, "/dicionarios", HashMap::new()).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body, "f.csv");

    let open = reply(&state, "/carregar", params(&[("dicionario", "f.csv")])).await;
    assert_eq!(open.body, "3");

    let entries = reply(
        &state,
        "/verbetes",
        params(&[("dic", "f.csv"), ("inicio", "0"), ("fim", "2")]),
    )
    .await;
    assert_eq!(entries.status, StatusCode::OK);
    assert_eq!(entries.body, "apple\tfruit\nbanana\tfruit");

    let nearest = reply(
        &state,
        "/buscar",
        params(&[("dic", "f.csv"), ("verbete", "aardvark")]),
    )
    .await;
    assert_eq!(nearest.body, "0");
}

#[tokio::test]
async fn test_unreadable_dictionary_is_server_error() {
    let state = state_with(Arc::new(MemoryStorage::new_default()));

    let open = reply(&state, "/carregar", params(&[("dicionario", "nope.csv")])).await;
    assert_eq!(open.status, StatusCode::INTERNAL_SERVER_ERROR);

    let entries = reply(
        &state,
        "/verbetes",
        params(&[("dic", "nope.csv"), ("inicio", "x"), ("fim", "2")]),
    )
    .await;
    assert_eq!(entries.status, StatusCode::OK);
    assert_eq!(entries.body, "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_opens_share_one_read() {
    let storage = Arc::new(MemoryStorage::new(MemoryStorageConfig {
        read_latency: Some(Duration::from_millis(100)),
        ..MemoryStorageConfig::default()
    }));
    storage.put("f.csv", "apple\tfruit\nbanana\tfruit\n");
    let state = state_with(storage.clone());

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move {
                reply(&state, "/carregar", params(&[("dicionario", "f.csv")])).await
            })
        })
        .collect();

    for task in tasks {
        let answer = task.await.unwrap();
        assert_eq!(answer.status, StatusCode::OK);
        assert_eq!(answer.body, "2");
    }
    assert_eq!(storage.read_count("f.csv"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_open_does_not_stall_cached_queries() {
    let storage = Arc::new(MemoryStorage::new(MemoryStorageConfig {
        read_latency: Some(Duration::from_millis(400)),
        ..MemoryStorageConfig::default()
    }));
    storage.put("fast.csv", "a\t1\nb\t2\n");
    storage.put("slow.csv", "c\t3\n");
    let state = state_with(storage);
    reply(&state, "/carregar", params(&[("dicionario", "fast.csv")])).await;

    let slow = {
        let state = state.clone();
        tokio::spawn(async move {
            reply(&state, "/carregar", params(&[("dicionario", "slow.csv")])).await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fast = tokio::time::timeout(
        Duration::from_millis(250),
        reply(
            &state,
            "/verbetes",
            params(&[("dic", "fast.csv"), ("inicio", "0"), ("fim", "5")]),
        ),
    )
    .await
    .unwrap();
    assert_eq!(fast.body, "a\t1\nb\t2");

    assert_eq!(slow.await.unwrap().body, "1");
}
