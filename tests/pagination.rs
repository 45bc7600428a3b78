// tests/pagination.rs
//! Cursor walks through `Paginator`.

mod common;

use common::{client, network, ok, ScriptedTransport};
use monday_cli::api::queries;
use monday_cli::{BoardId, ClassifiedError, GraphqlRequest, PageSize, PageTemplate, Paginator};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn template() -> PageTemplate {
    PageTemplate::new(
        GraphqlRequest::new("query Items($limit: Int, $cursor: String) { list }"),
        "/list",
    )
}

fn page(items: Value, cursor: Value, has_more: bool) -> monday_cli::RawOutcome {
    ok(json!({ "list": { "items": items, "cursor": cursor, "has_more": has_more } }))
}

#[tokio::test(start_paused = true)]
async fn test_fetch_all_concatenates_pages_in_order() {
    let transport = ScriptedTransport::new([
        page(json!([1, 2]), json!("a"), true),
        page(json!([3]), Value::Null, false),
    ]);
    let client = client(&transport);

    let items = Paginator::new(&client)
        .fetch_all(&template(), PageSize::default(), None, None)
        .await
        .unwrap();

    assert_eq!(items, vec![json!(1), json!(2), json!(3)]);
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].variables()["cursor"], Value::Null);
    assert_eq!(requests[0].variables()["limit"], json!(100));
    assert_eq!(requests[1].variables()["cursor"], json!("a"));
}

#[tokio::test(start_paused = true)]
async fn test_failure_mid_walk_discards_partial_results() {
    let transport = ScriptedTransport::new([
        page(json!([1, 2]), json!("a"), true),
        network(),
        network(),
        network(),
    ]);
    let client = client(&transport);

    let result = Paginator::new(&client)
        .fetch_all(&template(), PageSize::default(), None, None)
        .await;

    assert!(matches!(result, Err(ClassifiedError::Network { .. })));
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_stop_after_pages_limits_requests() {
    let transport = ScriptedTransport::new([
        page(json!([1]), json!("a"), true),
        page(json!([2]), json!("b"), true),
    ]);
    let client = client(&transport);
    let paginator = Paginator::new(&client);

    let items = paginator
        .fetch_all(&template(), PageSize::default(), None, Some(1))
        .await
        .unwrap();
    assert_eq!(items, vec![json!(1)]);
    assert_eq!(transport.call_count(), 1);

    let items = paginator
        .fetch_all(&template(), PageSize::default(), None, Some(0))
        .await
        .unwrap();
    assert!(items.is_empty());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_has_more_follows_cursor() {
    let transport = ScriptedTransport::new([
        ok(json!({ "list": { "items": ["x"], "cursor": "next" } })),
        ok(json!({ "list": { "items": ["y"], "cursor": "" } })),
    ]);
    let client = client(&transport);

    let items = Paginator::new(&client)
        .fetch_all(&template(), PageSize::new(1).unwrap(), None, None)
        .await
        .unwrap();

    assert_eq!(items, vec![json!("x"), json!("y")]);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_board_items_switch_to_next_items_page() {
    let transport = ScriptedTransport::new([
        ok(json!({
            "boards": [{ "id": "5", "items_page": { "cursor": "c1", "items": [{ "id": "1" }] } }]
        })),
        ok(json!({
            "next_items_page": { "cursor": null, "items": [{ "id": "2" }] }
        })),
    ]);
    let client = client(&transport);
    let board = BoardId::parse("5").unwrap();

    let items = Paginator::new(&client)
        .fetch_all(&queries::board_items(&board), PageSize::new(50).unwrap(), None, None)
        .await
        .unwrap();

    assert_eq!(items, vec![json!({ "id": "1" }), json!({ "id": "2" })]);
    let requests = transport.requests();
    assert_eq!(requests[0].variables()["boardIds"], json!(["5"]));
    assert!(requests[0].query().contains("items_page"));
    assert!(requests[1].query().contains("next_items_page"));
    assert_eq!(requests[1].variables()["cursor"], json!("c1"));
    assert_eq!(requests[1].variables()["limit"], json!(50));
}

#[tokio::test(start_paused = true)]
async fn test_start_cursor_resumes_with_continuation() {
    let transport = ScriptedTransport::new([ok(json!({
        "next_items_page": { "cursor": null, "items": [{ "id": "9" }] }
    }))]);
    let client = client(&transport);
    let board = BoardId::parse("5").unwrap();

    let items = Paginator::new(&client)
        .fetch_all(
            &queries::board_items(&board),
            PageSize::default(),
            Some("resume".to_string()),
            None,
        )
        .await
        .unwrap();

    assert_eq!(items, vec![json!({ "id": "9" })]);
    assert_eq!(transport.requests()[0].variables()["cursor"], json!("resume"));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_envelope_is_unknown() {
    let transport = ScriptedTransport::new([ok(json!({ "other": 1 }))]);
    let client = client(&transport);

    let result = Paginator::new(&client)
        .fetch_page(&template(), PageSize::default(), None)
        .await;

    assert!(matches!(result, Err(ClassifiedError::Unknown { .. })));
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_page_size_is_validated_before_any_request() {
    assert!(PageSize::new(0).is_err());
    assert!(PageSize::new(501).is_err());
    assert_eq!(PageSize::new(500).unwrap().get(), 500);
}
