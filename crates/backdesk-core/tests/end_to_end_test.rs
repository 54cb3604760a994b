#![allow(clippy::unwrap_used)]
// End-to-end scenarios over a mock backend: a real ApiClient behind a
// TableSession, asserting the exact wire bodies the coordinator builds.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use backdesk_api::ApiClient;
use backdesk_core::bulk::{apply_label_diff, diff_labels};
use backdesk_core::{ComplianceSource, CustomerSource, SessionOptions, Settings, TableSession};

async fn setup() -> (MockServer, Arc<ApiClient>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let api = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
    (server, api)
}

fn compliance_row(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "customer_id": format!("cus-{id}"),
        "status": "pending",
        "call_started_at": "2024-06-15T10:30:00Z",
        "duration_secs": 120
    })
}

#[tokio::test]
async fn typing_a_query_fetches_one_filtered_page() {
    let (server, api) = setup().await;

    let rows: Vec<_> = (1..=8).map(|i| compliance_row(&format!("cmp-{i}"))).collect();
    Mock::given(method("POST"))
        .and(path("/api/v1/compliances/query"))
        .and(body_partial_json(json!({
            "q": "fraud",
            "page": 1,
            "per_page": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "compliances": rows,
            "total_count": 8
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, snap, _events) = TableSession::new(
        ComplianceSource::new(api),
        "compliance",
        Settings::in_memory(),
        SessionOptions {
            default_per_page: 10,
            ..SessionOptions::default()
        },
    );

    // User types "fraud"; the request fires after the debounce window.
    session.set_query_input("fraud");
    tokio::time::sleep(Duration::from_millis(600)).await;

    let snapshot = snap.borrow().clone();
    assert_eq!(snapshot.rows.len(), 8);
    assert_eq!(snapshot.total_count, 8);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.range_label(session.page()), "1\u{2013}8 of 8");
}

#[tokio::test]
async fn select_all_matching_label_assignment_sends_filters_not_ids() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/customers/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [],
            "total_count": 120
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/customers/labels"))
        .and(body_partial_json(json!({
            "select_all": true,
            "q": "fraud",
            "label_ids": [5],
            "action": "assign"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _snap, _events) = TableSession::new(
        CustomerSource::new(Arc::clone(&api)),
        "customers",
        Settings::in_memory(),
        SessionOptions::default(),
    );

    session.set_query_input("fraud");
    tokio::time::sleep(Duration::from_millis(600)).await;

    session.select_all_matching();
    let scope = session.bulk_scope().unwrap();

    let diff = diff_labels(&[], &[5]);
    apply_label_diff(&api, &scope, &diff).await.unwrap();

    // The all-matching payload never enumerates ids.
    let requests = server.received_requests().await.unwrap();
    let label_call = requests
        .iter()
        .find(|r| r.url.path().ends_with("customers/labels"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&label_call.body).unwrap();
    assert!(body.get("ids").is_none());
}

#[tokio::test]
async fn label_rechoice_issues_at_most_two_batch_calls() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/customers/labels"))
        .and(body_partial_json(json!({"action": "assign", "label_ids": [3]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/customers/labels"))
        .and(body_partial_json(json!({"action": "remove", "label_ids": [1]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    // Checked {1,2}, user chose {2,3}: assign 3, remove 1, leave 2 alone.
    let diff = diff_labels(&[1, 2], &[2, 3]);
    let scope = backdesk_api::BulkScope::Ids {
        ids: vec!["cus-1".into()],
    };
    apply_label_diff(&api, &scope, &diff).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}
