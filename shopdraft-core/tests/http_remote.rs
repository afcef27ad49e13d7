//! Integration tests for `HttpRemote` and `RemoteSync` using wiremock HTTP mocks.

use serde_json::json;
use shopdraft_core::{
    DraftStore, HttpRemote, IdStrategy, MemoryCache, Product, ProductFields, RemoteStore,
    RemoteSync, SyncError, SyncOutcome, SyncStatus, DEFAULT_CACHE_KEY, DEFAULT_PLACEHOLDER_IMAGE,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOC_PATH: &str = "/documents/products";

fn document_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), DOC_PATH)
}

fn local_draft() -> DraftStore<MemoryCache> {
    let cache = MemoryCache::new().with_entry(
        DEFAULT_CACHE_KEY,
        r#"[{"id":1,"name":"Local pizza","price":100,"image":"https://x.io/l.png"}]"#,
    );
    let mut draft = DraftStore::new(cache).with_id_strategy(IdStrategy::Sequential);
    draft.load();
    draft
}

#[tokio::test]
async fn fetch_returns_document_and_bypasses_caches() {
    let server = MockServer::start().await;
    let body = json!([{"id": 1, "name": "Pizza", "price": 120, "image": "https://x.io/p.png"}]);

    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&document_url(&server)).expect("valid url");
    let values = remote.fetch().await.expect("fetch should succeed");

    assert_eq!(values, body.as_array().unwrap().clone());

    let requests = server.received_requests().await.expect("recording enabled");
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.starts_with("t="), "missing cache buster: {query}");
}

#[tokio::test]
async fn fetch_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&document_url(&server)).unwrap();
    let err = remote.fetch().await.unwrap_err();

    assert!(matches!(err, SyncError::Status(status) if status.as_u16() == 503));
    assert!(err.is_network_or_http());
}

#[tokio::test]
async fn fetch_rejects_enveloped_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&document_url(&server)).unwrap();
    let err = remote.fetch().await.unwrap_err();

    assert!(matches!(err, SyncError::Payload(_)));
    assert!(err.to_string().contains("an object"));
}

#[tokio::test]
async fn replace_posts_full_array() {
    let server = MockServer::start().await;
    let products = vec![
        Product::new(1, "Pizza", 120.0, "https://x.io/p.png"),
        Product::new(2, "Soda", 25.0, "https://x.io/s.png").with_description("Cold"),
    ];
    let expected = serde_json::to_value(&products).unwrap();

    Mock::given(method("POST"))
        .and(path(DOC_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(1)
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&document_url(&server)).unwrap();
    let stored = remote.replace(&products).await.expect("replace should succeed");

    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn pull_overwrites_draft_with_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Remote calzone", "price": 90}
        ])))
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&document_url(&server)).unwrap();
    let mut sync = RemoteSync::new(local_draft(), remote);
    let mut statuses: Vec<SyncStatus> = Vec::new();

    let outcome = sync
        .pull(&mut |_: &str| true, &mut statuses)
        .await
        .expect("not in flight");

    assert!(matches!(outcome, SyncOutcome::Completed { products: 1 }));
    let draft = sync.draft();
    assert_eq!(draft.products()[0].id, 7);
    assert_eq!(draft.products()[0].image, DEFAULT_PLACEHOLDER_IMAGE);
    assert_eq!(draft.products()[0].description, "");

    let cached: Vec<Product> =
        serde_json::from_str(draft.cache().get(DEFAULT_CACHE_KEY).unwrap()).unwrap();
    assert_eq!(cached, draft.products());
}

#[tokio::test]
async fn pull_with_unreachable_remote_keeps_draft() {
    let server = MockServer::start().await;
    let url = document_url(&server);
    drop(server);

    let remote = HttpRemote::new(&url).unwrap();
    let mut sync = RemoteSync::new(local_draft(), remote);
    let before = sync.draft().products().to_vec();
    let mut statuses: Vec<SyncStatus> = Vec::new();

    let outcome = sync
        .pull(&mut |_: &str| true, &mut statuses)
        .await
        .expect("not in flight");

    match outcome {
        SyncOutcome::Failed(e) => assert!(matches!(e, SyncError::Network(_))),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sync.draft().products(), before.as_slice());

    let last = statuses.last().expect("a status was reported");
    assert!(matches!(last, SyncStatus::Failure { .. }));
    assert!(last.control_enabled());
}

#[tokio::test]
async fn push_publishes_normalized_draft() {
    let server = MockServer::start().await;

    let mut draft = local_draft();
    draft
        .upsert(None, ProductFields::new("Soda", 25.0, "   "))
        .unwrap();
    let expected_products = draft.normalizer().normalize_all(draft.products().to_vec());
    let expected = serde_json::to_value(&expected_products).unwrap();

    Mock::given(method("POST"))
        .and(path(DOC_PATH))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(1)
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&document_url(&server)).unwrap();
    let mut sync = RemoteSync::new(draft, remote);
    let mut statuses: Vec<SyncStatus> = Vec::new();

    let outcome = sync
        .push(&mut |_: &str| true, &mut statuses)
        .await
        .expect("not in flight");

    assert!(outcome.is_completed());
    assert_eq!(sync.draft().products(), expected_products.as_slice());
    assert_eq!(sync.draft().products()[1].image, DEFAULT_PLACEHOLDER_IMAGE);
}

#[tokio::test]
async fn push_server_error_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&document_url(&server)).unwrap();
    let mut sync = RemoteSync::new(local_draft(), remote);
    let mut statuses: Vec<SyncStatus> = Vec::new();

    let outcome = sync
        .push(&mut |_: &str| true, &mut statuses)
        .await
        .expect("not in flight");

    assert!(matches!(outcome, SyncOutcome::Failed(SyncError::Status(_))));
    assert_eq!(sync.draft().len(), 1);
    assert!(matches!(statuses.last(), Some(SyncStatus::Failure { .. })));
}
