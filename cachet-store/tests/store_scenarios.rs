//! End-to-end scenarios over the store and its tagged views, using the
//! in-memory reference connection with a frozen clock.

use std::sync::Arc;

use cachet_store::{
    CacheStore, FixedClock, InMemoryConnection, StoreConfig,
};
use chrono::{TimeZone, Utc};

fn frozen(secs: i64) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp"),
    ))
}

fn session_store() -> (Arc<InMemoryConnection>, Arc<FixedClock>, CacheStore<InMemoryConnection>) {
    let clock = frozen(1_700_000_000);
    let connection = Arc::new(InMemoryConnection::with_clock(clock.clone()));
    let store = CacheStore::new(
        connection.clone(),
        StoreConfig::new("cache").with_prefix("app:"),
    )
    .with_clock(clock.clone());
    (connection, clock, store)
}

#[tokio::test]
async fn session_lifecycle() {
    let (_, _, store) = session_store();

    assert!(store
        .put("session:42", &"abc", 60, &[])
        .await
        .expect("put"));

    let session: Option<String> = store.get("session:42").await.expect("get");
    assert_eq!(session.as_deref(), Some("abc"));

    let minutes = store
        .get_expiration("session:42")
        .await
        .expect("expiration")
        .expect("present");
    assert!((0..=1).contains(&minutes));

    assert!(store.forget("session:42").await.expect("forget"));
    let session: Option<String> = store.get("session:42").await.expect("get");
    assert!(session.is_none());
}

#[tokio::test]
async fn ttl_expiry_through_the_index() {
    let (_, clock, store) = session_store();

    store.ensure_indexes().await.expect("index");
    store.put("session:42", &"abc", 60, &[]).await.expect("put");

    // Still live just before the deadline.
    clock.advance_seconds(59);
    assert!(store
        .get::<String>("session:42")
        .await
        .expect("get")
        .is_some());

    // Dead at the deadline: zero grace period.
    clock.advance_seconds(1);
    assert!(store
        .get::<String>("session:42")
        .await
        .expect("get")
        .is_none());
}

#[tokio::test]
async fn dropping_indexes_stops_expiry() {
    let (_, clock, store) = session_store();

    store.ensure_indexes().await.expect("index");
    store.drop_indexes().await.expect("drop");

    store.put("session:42", &"abc", 60, &[]).await.expect("put");
    clock.advance_seconds(3_600);

    // Without the TTL rule the dead record is still served; callers see
    // it via the negative expiration instead.
    assert!(store
        .get::<String>("session:42")
        .await
        .expect("get")
        .is_some());
    let minutes = store
        .get_expiration("session:42")
        .await
        .expect("expiration")
        .expect("present");
    assert!(minutes < 0);
}

#[tokio::test]
async fn group_invalidation_across_views() {
    let (_, _, store) = session_store();

    let users = store.tags(["users"]);
    let reports = store.tags(["reports"]);

    users.put("user:1", &"alice", Some(300)).await.expect("put");
    users.put("user:2", &"bob", Some(300)).await.expect("put");
    reports.put("report:q3", &"draft", Some(300)).await.expect("put");

    users.flush().await.expect("flush");

    assert!(store.get::<String>("user:1").await.expect("get").is_none());
    assert!(store.get::<String>("user:2").await.expect("get").is_none());
    assert_eq!(
        store.get::<String>("report:q3").await.expect("get").as_deref(),
        Some("draft")
    );
}

#[tokio::test]
async fn tagged_writes_always_carry_bound_tags() {
    let (connection, _, store) = session_store();

    // The same key written through differently-bound views ends with the
    // last writer's tags, wholesale.
    store.tags(["x", "y"]).put("k", &"v", Some(60)).await.expect("put");
    let record = connection.raw_get("cache", "app:k").expect("present");
    assert_eq!(record.tags, vec!["x".to_string(), "y".to_string()]);

    store.tags(["z"]).put("k", &"v", Some(60)).await.expect("put");
    let record = connection.raw_get("cache", "app:k").expect("present");
    assert_eq!(record.tags, vec!["z".to_string()]);
}

#[tokio::test]
async fn sequential_counters_preserve_deadline() {
    let (connection, clock, store) = session_store();

    // Increments on a missing key never create it.
    assert_eq!(store.increment("hits", 1).await.expect("increment"), None);
    assert_eq!(store.increment("hits", 1).await.expect("increment"), None);

    store.put("hits", &0i64, 600, &[]).await.expect("put");
    let deadline = connection
        .raw_get("cache", "app:hits")
        .expect("present")
        .expiration;

    for expected in 1..=5i64 {
        clock.advance_seconds(30);
        assert_eq!(
            store.increment("hits", 1).await.expect("increment"),
            Some(expected)
        );
    }

    // Five rewrites later the deadline has not drifted.
    let after = connection
        .raw_get("cache", "app:hits")
        .expect("present")
        .expiration;
    assert_eq!(after, deadline);
}

#[tokio::test]
async fn flush_is_unconditional() {
    let (connection, _, store) = session_store();

    store.put("a", &1i64, 60, &[]).await.expect("put");
    store
        .tags(["t"])
        .put("b", &2i64, Some(60))
        .await
        .expect("put");
    store.forever("c", &3i64).await.expect("forever");

    assert!(store.flush().await.expect("flush"));
    assert_eq!(connection.record_count("cache"), 0);
}
