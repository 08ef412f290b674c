//! Every backend must honour the same range/insert/remove contract.
//! Redis runs the same checks under `--ignored` with REDIS_URL set.

use std::sync::Arc;

use chrono::DateTime;
use tinytodo_server::models::Item;
use tinytodo_server::store::{ItemStore, MemoryStore, SqliteStore, StoreError, Window};
use tinytodo_server::Resolver;

fn item(n: i64) -> Item {
    Item {
        id: format!("item-{:03}", n),
        title: format!("title {}", n),
        content: (n % 2 == 0).then(|| format!("content {}", n)),
        created_at: DateTime::from_timestamp_micros(1_700_000_000_000_000 + n).unwrap(),
    }
}

fn window(offset: u64, limit: u32) -> Window {
    Window {
        offset,
        limit,
        before: None,
    }
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

async fn check_contract(store: Arc<dyn ItemStore>) {
    store.ping().await.unwrap();

    // inserted out of order on purpose
    for n in [3, 1, 4, 0, 2] {
        store.insert(&item(n)).await.unwrap();
    }

    let all = store.range(window(0, 10)).await.unwrap();
    assert_eq!(
        ids(&all),
        ["item-000", "item-001", "item-002", "item-003", "item-004"]
    );
    assert_eq!(all[2], item(2));
    assert_eq!(all[1].content, None);

    // stable for a fixed state
    let once = store.range(window(1, 2)).await.unwrap();
    let twice = store.range(window(1, 2)).await.unwrap();
    assert_eq!(once, twice);

    // adjacent pages neither overlap nor leave gaps
    let mut walked = Vec::new();
    let mut offset = 0;
    loop {
        let page = store.range(window(offset, 2)).await.unwrap();
        if page.is_empty() {
            break;
        }
        offset += page.len() as u64;
        walked.extend(page);
    }
    assert_eq!(walked, all);

    // offset past the end is empty, not an error
    assert!(store.range(window(50, 10)).await.unwrap().is_empty());

    // boundary is inclusive
    let fenced = store
        .range(Window {
            offset: 0,
            limit: 10,
            before: Some(item(2).created_at),
        })
        .await
        .unwrap();
    assert_eq!(ids(&fenced), ["item-000", "item-001", "item-002"]);

    let fenced_tail = store
        .range(Window {
            offset: 2,
            limit: 10,
            before: Some(item(2).created_at),
        })
        .await
        .unwrap();
    assert_eq!(ids(&fenced_tail), ["item-002"]);

    // a second insert of a stored id is rejected and changes nothing
    let mut moved = item(2);
    moved.title = "replacement".into();
    moved.created_at = item(4).created_at;
    let err = store.insert(&moved).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { ref id } if id == "item-002"));
    assert_eq!(store.get("item-002").await.unwrap(), Some(item(2)));
    assert_eq!(store.range(window(0, 10)).await.unwrap(), all);

    // lookup
    assert_eq!(store.get("item-004").await.unwrap(), Some(item(4)));
    assert_eq!(store.get("item-999").await.unwrap(), None);

    // idempotent removal
    store.remove("item-001").await.unwrap();
    store.remove("item-001").await.unwrap();
    store.remove("never-existed").await.unwrap();

    let after_remove = store.range(window(0, 10)).await.unwrap();
    assert_eq!(
        ids(&after_remove),
        ["item-000", "item-002", "item-003", "item-004"]
    );
    assert_eq!(store.get("item-001").await.unwrap(), None);

    store.close().await.unwrap();
}

async fn check_resolver_paging(store: Arc<dyn ItemStore>) {
    let resolver = Resolver::new(store);
    for title in ["A", "B", "C"] {
        resolver.add_item(title, None).await.unwrap();
    }

    let first = resolver.items(Some(2), None).await.unwrap();
    let titles: Vec<_> = first.nodes().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
    assert!(first.page_info.has_next_page);

    let second = resolver
        .items(Some(2), Some(&first.page_info.end_cursor))
        .await
        .unwrap();
    let titles: Vec<_> = second.nodes().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["C"]);
    assert!(second.page_info.has_previous_page);
    assert!(!second.page_info.has_next_page);
}

#[tokio::test]
async fn memory_store_contract() {
    check_contract(Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn sqlite_memory_store_contract() {
    check_contract(Arc::new(SqliteStore::open_in_memory().await.unwrap())).await;
}

#[tokio::test]
async fn sqlite_file_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("contract.db").display());
    check_contract(Arc::new(SqliteStore::open(&url).await.unwrap())).await;
}

#[tokio::test]
async fn memory_resolver_paging() {
    check_resolver_paging(Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn sqlite_resolver_paging() {
    check_resolver_paging(Arc::new(SqliteStore::open_in_memory().await.unwrap())).await;
}

#[cfg(feature = "redis")]
mod redis_backend {
    use super::*;
    use tinytodo_server::store::RedisStore;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires redis with an empty todos:items:all set"]
    async fn redis_store_contract() {
        let store = RedisStore::open(&redis_url()).await.unwrap();
        check_contract(Arc::new(store)).await;
    }
}
