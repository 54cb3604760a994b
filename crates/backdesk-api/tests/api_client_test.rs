#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use backdesk_api::{ApiClient, BulkScope, Error, LabelAction, ListQuery};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn api_path(suffix: &str) -> String {
    format!("/api/v1/{suffix}")
}

// ── List query tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_query_compliances() {
    let (server, client) = setup().await;

    let body = json!({
        "compliances": [{
            "id": "cmp-1",
            "customer_id": "cus-9",
            "customer_name": "Ada Lovelace",
            "agent": "mbrown",
            "status": "pending",
            "score": 82.5,
            "call_started_at": "2024-06-15T10:30:00Z",
            "duration_secs": 412,
            "flagged": true
        }],
        "total_count": 37
    });

    Mock::given(method("POST"))
        .and(path(api_path("compliances/query")))
        .and(body_partial_json(json!({"page": 1, "per_page": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page = client
        .query_compliances(&ListQuery::page(1, 10))
        .await
        .unwrap();

    assert_eq!(page.total_count, 37);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].id, "cmp-1");
    assert_eq!(page.rows[0].agent.as_deref(), Some("mbrown"));
    assert!(page.rows[0].flagged);
}

#[tokio::test]
async fn test_query_sends_filters_and_sorting() {
    let (server, client) = setup().await;

    let body = json!({"customers": [], "total_count": 0});

    Mock::given(method("POST"))
        .and(path(api_path("customers/query")))
        .and(body_partial_json(json!({
            "page": 3,
            "per_page": 25,
            "q": "smith",
            "sorting": {"created_at": false},
            "status": "active"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let mut query = ListQuery::page(3, 25);
    query.q = Some("smith".into());
    query.sorting.insert("created_at".into(), false);
    query
        .filters
        .insert("status".into(), serde_json::Value::String("active".into()));

    let page = client.query_customers(&query).await.unwrap();
    assert_eq!(page.total_count, 0);
    assert!(page.rows.is_empty());
}

// ── Bulk mutation tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_label_assign_by_ids() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("customers/labels")))
        .and(body_partial_json(json!({
            "ids": ["cus-1", "cus-2"],
            "label_ids": [7],
            "action": "assign"
        })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .mutate_customer_labels(
            BulkScope::Ids {
                ids: vec!["cus-1".into(), "cus-2".into()],
            },
            vec![7],
            LabelAction::Assign,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_label_assign_select_all_sends_no_id_array() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("customers/labels")))
        .and(body_partial_json(json!({
            "select_all": true,
            "q": "fraud",
            "label_ids": [5],
            "action": "assign"
        })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .mutate_customer_labels(
            BulkScope::AllMatching {
                select_all: true,
                q: Some("fraud".into()),
                filters: serde_json::Map::new(),
                first_n: None,
            },
            vec![5],
            LabelAction::Assign,
        )
        .await
        .unwrap();

    // The matcher above only checks a subset; assert the full body has
    // no `ids` key at all.
    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.get("ids").is_none());
}

// ── Error mapping tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "token expired"
        })))
        .mount(&server)
        .await;

    let result = client.list_labels().await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("token expired"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_backend_message_surfaces_on_mutation_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("customers/delete")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "cannot delete customers with open tickets"
        })))
        .mount(&server)
        .await;

    let result = client
        .delete_customers(BulkScope::Ids {
            ids: vec!["cus-1".into()],
        })
        .await;

    match result {
        Err(Error::Api {
            ref message,
            status,
        }) => {
            assert_eq!(status, 422);
            assert!(message.contains("open tickets"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_deserialization() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("labels")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_labels().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}
