//! End-to-end RPC tests
//!
//! Each test boots the real stack: a seeded SQLite file, a mutual-TLS
//! listener on an OS-assigned port, and SDK clients talking to it with
//! PEM credentials.

mod common;

use common::*;

use async_trait::async_trait;
use cattery_api_rpc::transport::client_tls_config;
use cattery_api_rpc::types::{ListCatsRequest, LIST_CATS_METHOD};
use cattery_api_rpc::{RpcChannel, ShutdownSender};
use cattery_core::domain::{Cat, CatId};
use cattery_core::error::AppError;
use cattery_core::port::CatRepository;
use cattery_infra_sqlite::SqliteCatRepository;
use cattery_sdk::{CatteryClient, SdkError};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A running daemon stack plus the TLS material to reach it
struct Stack {
    fixture: TlsFixture,
    addr: SocketAddr,
    shutdown_tx: ShutdownSender,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl Stack {
    async fn client(&self) -> CatteryClient {
        CatteryClient::connect(
            format!("localhost:{}", self.addr.port()),
            &self.fixture.client_tls_options(),
        )
        .await
        .unwrap()
    }

    async fn teardown(self) {
        self.shutdown_tx.shutdown();
        self.handle.await.unwrap().unwrap();
        self.fixture.cleanup();
    }
}

async fn boot(tag: &str, count: i64) -> Stack {
    let fixture = TlsFixture::new(tag);
    let pool = seeded_pool(&fixture.dir, count).await;
    let tls = server_config(&fixture.ca, &fixture.server);
    let (addr, shutdown_tx, handle) =
        spawn_server(Arc::new(SqliteCatRepository::new(pool)), tls).await;

    Stack {
        fixture,
        addr,
        shutdown_tx,
        handle,
    }
}

#[tokio::test]
async fn test_first_page_is_newest_first() {
    let stack = boot("e2e_first_page", 25).await;
    let client = stack.client().await;

    let cats = client.list_cats(0, 10).await.unwrap();
    let ids: Vec<i64> = cats.iter().map(|c| c.id).collect();
    assert_eq!(ids, (16..=25).rev().collect::<Vec<i64>>());
    assert_eq!(cats[0].name, "cat-25");

    client.close().await.unwrap();
    stack.teardown().await;
    println!("✅ First page returns the ten newest cats");
}

#[tokio::test]
async fn test_cursor_excludes_cats_already_seen() {
    let stack = boot("e2e_cursor", 25).await;
    let client = stack.client().await;

    // Cursor 16 bounds ids from below, exclusively
    let cats = client.list_cats(16, 10).await.unwrap();
    let ids: Vec<i64> = cats.iter().map(|c| c.id).collect();
    assert_eq!(cats.len(), 9);
    assert_eq!(ids, (17..=25).rev().collect::<Vec<i64>>());

    // Cursor at the newest id yields nothing
    let past_end = client.list_cats(25, 10).await.unwrap();
    assert!(past_end.is_empty());

    client.close().await.unwrap();
    stack.teardown().await;
    println!("✅ Cursor pagination is exclusive");
}

#[tokio::test]
async fn test_oversized_limit_is_clamped_not_rejected() {
    let stack = boot("e2e_clamp", 25).await;
    let client = stack.client().await;

    let cats = client.list_cats(0, 100_000).await.unwrap();
    assert_eq!(cats.len(), 25);

    client.close().await.unwrap();
    stack.teardown().await;
    println!("✅ Oversized limits are clamped");
}

#[tokio::test]
async fn test_absent_timestamp_is_omitted_on_the_wire() {
    let stack = boot("e2e_wire_shape", 4).await;

    // Raw channel so the untyped JSON can be inspected
    let config = client_tls_config(
        stack.fixture.ca.root_store(),
        stack.fixture.client.credentials(),
    )
    .unwrap();
    let mut channel = RpcChannel::connect(&format!("localhost:{}", stack.addr.port()), config)
        .await
        .unwrap();

    let response: serde_json::Value = channel
        .call(
            LIST_CATS_METHOD,
            &ListCatsRequest {
                cursor: 0,
                limit: 10,
            },
        )
        .await
        .unwrap();

    let cats = response["cats"].as_array().unwrap();
    assert_eq!(cats.len(), 4);

    // Ids descend from 4. Even ids carry the timestamp, odd ids omit the
    // field entirely rather than sending null.
    let cat4 = cats[0].as_object().unwrap();
    assert_eq!(cat4["id"], 4);
    assert!(cat4.contains_key("lastUpdatedOn"));
    assert!(cat4["createdOn"].is_string());

    let cat3 = cats[1].as_object().unwrap();
    assert_eq!(cat3["id"], 3);
    assert!(!cat3.contains_key("lastUpdatedOn"));

    channel.close().await.unwrap();
    stack.teardown().await;
    println!("✅ Absent timestamps are omitted from the wire");
}

/// Repository that fails the first query and then recovers
struct FlakyRepository {
    inner: SqliteCatRepository,
    failed_once: AtomicBool,
}

#[async_trait]
impl CatRepository for FlakyRepository {
    async fn list_after(&self, cursor: CatId, limit: i64) -> cattery_core::Result<Vec<Cat>> {
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err(AppError::Query("transient storage failure".to_string()));
        }
        self.inner.list_after(cursor, limit).await
    }

    async fn ping(&self) -> cattery_core::Result<()> {
        self.inner.ping().await
    }
}

#[tokio::test]
async fn test_call_error_leaves_the_connection_usable() {
    let fixture = TlsFixture::new("e2e_flaky");
    let pool = seeded_pool(&fixture.dir, 25).await;
    let repo = Arc::new(FlakyRepository {
        inner: SqliteCatRepository::new(pool),
        failed_once: AtomicBool::new(false),
    });
    let tls = server_config(&fixture.ca, &fixture.server);
    let (addr, shutdown_tx, handle) = spawn_server(repo, tls).await;

    let client = CatteryClient::connect(
        format!("localhost:{}", addr.port()),
        &fixture.client_tls_options(),
    )
    .await
    .unwrap();

    // First call hits the injected failure and is reported in-band
    let err = client.list_cats(0, 10).await.unwrap_err();
    match err {
        SdkError::Call(e) => assert!(e.to_string().contains("transient storage failure")),
        other => panic!("expected a call error, got {:?}", other),
    }

    // Same connection, next call succeeds
    let cats = client.list_cats(0, 10).await.unwrap();
    assert_eq!(cats.len(), 10);

    client.close().await.unwrap();
    shutdown_tx.shutdown();
    handle.await.unwrap().unwrap();
    fixture.cleanup();
    println!("✅ A failed call does not poison the connection");
}

#[tokio::test]
async fn test_invalid_arguments_are_rejected_in_band() {
    let stack = boot("e2e_validation", 5).await;
    let client = stack.client().await;

    let err = client.list_cats(-1, 10).await.unwrap_err();
    assert!(err.to_string().contains("cursor must be >= 0"));

    let err = client.list_cats(0, 0).await.unwrap_err();
    assert!(err.to_string().contains("limit must be > 0"));

    // The connection survives both rejected calls
    let cats = client.list_cats(0, 10).await.unwrap();
    assert_eq!(cats.len(), 5);

    client.close().await.unwrap();
    stack.teardown().await;
    println!("✅ Validation failures are call-scoped");
}

#[tokio::test]
async fn test_unknown_method_is_reported_in_band() {
    let stack = boot("e2e_unknown_method", 5).await;

    let config = client_tls_config(
        stack.fixture.ca.root_store(),
        stack.fixture.client.credentials(),
    )
    .unwrap();
    let mut channel = RpcChannel::connect(&format!("localhost:{}", stack.addr.port()), config)
        .await
        .unwrap();

    let err = channel
        .call::<_, serde_json::Value>("cats.purr.v1", &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown method"));

    // Dispatch failures are call-scoped; the channel still works
    let response: serde_json::Value = channel
        .call(
            LIST_CATS_METHOD,
            &ListCatsRequest {
                cursor: 0,
                limit: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(response["cats"].as_array().unwrap().len(), 3);

    channel.close().await.unwrap();
    stack.teardown().await;
    println!("✅ Unknown methods are reported in-band");
}

#[tokio::test]
async fn test_concurrent_clients_get_consistent_pages() {
    let stack = boot("e2e_concurrent", 25).await;

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let opts = stack.fixture.client_tls_options();
        let addr = format!("localhost:{}", stack.addr.port());

        tasks.push(tokio::spawn(async move {
            let client = CatteryClient::connect(&addr, &opts).await.unwrap();
            for _ in 0..3 {
                let cats = client.list_cats(0, 5).await.unwrap();
                let ids: Vec<i64> = cats.iter().map(|c| c.id).collect();
                assert_eq!(ids, vec![25, 24, 23, 22, 21]);
            }
            client.close().await.unwrap();
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    stack.teardown().await;
    println!("✅ Concurrent clients see the same pages");
}
