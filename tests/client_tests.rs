//! Client and resource wrappers against a mock PIM server: token
//! lifecycle, query-parameter search, POST-body search, PATCH re-fetch,
//! and error mapping.

use akeneo_client::{AkeneoClient, Credentials, Error, SearchBuilder};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use httpmock::Mock;
use serde_json::json;

fn client_for(server: &MockServer) -> AkeneoClient {
    AkeneoClient::new(
        &server.base_url(),
        Credentials::new("client_id", "secret", "user", "pass"),
    )
    .unwrap()
}

async fn mock_token(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/oauth/v1/token")
                .json_body(json!({
                    "grant_type": "password",
                    "username": "user",
                    "password": "pass",
                }));
            then.status(200).json_body(json!({
                "access_token": "token-123",
                "expires_in": 3600,
                "token_type": "bearer",
                "refresh_token": "refresh-123",
            }));
        })
        .await
}

fn product_envelope() -> serde_json::Value {
    json!({
        "current_page": 1,
        "_links": {
            "self": {"href": "ignored"},
            "first": {"href": "ignored"},
            "next": {"href": "ignored"}
        },
        "_embedded": {
            "items": [
                {"identifier": "1234567", "enabled": true, "family": "clothing"},
                {"identifier": "7654321", "enabled": false}
            ]
        }
    })
}

#[tokio::test]
async fn token_is_fetched_once_and_reused() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;
    let product = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/rest/v1/products/1234567")
                .header("authorization", "Bearer token-123");
            then.status(200)
                .json_body(json!({"identifier": "1234567", "enabled": true}));
        })
        .await;

    let client = client_for(&server);
    client.products().get("1234567").await.unwrap();
    client.products().get("1234567").await.unwrap();

    token.assert_hits_async(1).await;
    product.assert_hits_async(2).await;
}

#[tokio::test]
async fn list_sends_criteria_and_pagination_as_query_params() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/rest/v1/products-uuid")
                .query_param("search", r#"{"enabled":[{"operator":"=","value":true}]}"#)
                .query_param("search_locale", "en_AU")
                .query_param("page", "2")
                .query_param("limit", "10");
            then.status(200).json_body(product_envelope());
        })
        .await;

    let client = client_for(&server);
    let mut search = SearchBuilder::new();
    search
        .filters(|f| {
            f.enabled(true)?;
            Ok(())
        })
        .unwrap()
        .search_locale("en_AU")
        .page(2)
        .limit(10);

    let page = client.products().list(&search).await.unwrap();
    list.assert_async().await;
    assert_eq!(page.len(), 2);
    assert!(page.has_next);
    assert!(!page.has_previous);
    assert_eq!(page.items[0].identifier.as_deref(), Some("1234567"));
}

#[tokio::test]
async fn post_search_sends_the_criteria_as_a_nested_body() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let search_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/rest/v1/products-uuid/search")
                .json_body(json!({
                    "search": {"family": [{"operator": "IN", "value": ["clothing"]}]},
                    "limit": 5,
                }));
            then.status(200).json_body(product_envelope());
        })
        .await;

    let client = client_for(&server);
    let mut search = SearchBuilder::new();
    search
        .filters(|f| {
            f.family(&["clothing"], "IN")?;
            Ok(())
        })
        .unwrap()
        .limit(5);

    let products = client.products().search(&search).await.unwrap();
    search_mock.assert_async().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].identifier.as_deref(), Some("7654321"));
}

#[tokio::test]
async fn patch_with_an_empty_response_refetches_the_entity() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let patch = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/rest/v1/products/1234567")
                .json_body(json!({"enabled": false}));
            then.status(204);
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/rest/v1/products/1234567");
            then.status(200)
                .json_body(json!({"identifier": "1234567", "enabled": false}));
        })
        .await;

    let client = client_for(&server);
    let product = client
        .products()
        .update("1234567", &json!({"enabled": false}))
        .await
        .unwrap();

    patch.assert_async().await;
    get.assert_async().await;
    assert_eq!(product.enabled, Some(false));
}

#[tokio::test]
async fn non_success_statuses_surface_the_server_message() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/rest/v1/products/missing");
            then.status(404)
                .json_body(json!({"code": 404, "message": "Resource `missing` does not exist."}));
        })
        .await;

    let client = client_for(&server);
    let err = client.products().get("missing").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Resource `missing` does not exist.");
        }
        other => panic!("expected Error::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_token_requests_become_authentication_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/oauth/v1/token");
            then.status(401).json_body(json!({"message": "bad credentials"}));
        })
        .await;

    let client = client_for(&server);
    let err = client.products().get("1234567").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}

#[tokio::test]
async fn bulk_update_sends_and_parses_newline_delimited_json() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let bulk = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/rest/v1/products")
                .header("content-type", "application/vnd.akeneo.collection+json")
                .body("{\"identifier\":\"1234567\"}\n{\"identifier\":\"7654321\"}");
            then.status(200).body(
                "{\"line\":1,\"identifier\":\"1234567\",\"status_code\":204}\n\
                 {\"line\":2,\"identifier\":\"7654321\",\"status_code\":422}",
            );
        })
        .await;

    let client = client_for(&server);
    let statuses = client
        .products()
        .bulk_update(&[
            json!({"identifier": "1234567"}),
            json!({"identifier": "7654321"}),
        ])
        .await
        .unwrap();

    bulk.assert_async().await;
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["status_code"], json!(204));
    assert_eq!(statuses[1]["identifier"], json!("7654321"));
}

#[tokio::test]
async fn product_models_and_categories_share_the_list_envelope() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/rest/v1/product-models");
            then.status(200).json_body(json!({
                "current_page": 1,
                "_embedded": {"items": [{"code": "shirt_style_01", "family": "clothing"}]}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/rest/v1/categories");
            then.status(200).json_body(json!({
                "current_page": 1,
                "_embedded": {"items": [{"code": "winter_collection", "labels": {"en_AU": "Winter"}}]}
            }));
        })
        .await;

    let client = client_for(&server);
    let search = SearchBuilder::new();

    let models = client.product_models().list(&search).await.unwrap();
    assert_eq!(models.items[0].code, "shirt_style_01");
    assert!(!models.has_next);

    let categories = client.categories().list(&search).await.unwrap();
    assert_eq!(categories.items[0].labels["en_AU"], "Winter");
}
