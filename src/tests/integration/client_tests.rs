//! Integration tests for the configuration API client, against a local
//! wiremock server serving the backend's documented endpoint shapes.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::client::{ApiClient, ApiError, RemoteProvider};
use crate::core::generation::{GenerationProvider, GenerationRequest, ProviderError};
use crate::core::workflow::{ContentType, DataMode};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn generation_request() -> GenerationRequest {
    GenerationRequest {
        trigger_id: "Q2 earnings beat".to_string(),
        stock_id: "AAPL".to_string(),
        content_type: ContentType::Paid,
        model_id: "openai/gpt-4o".to_string(),
        template: "Summarize {{cash_flow}}.".to_string(),
        section_order: vec!["cash_flow".to_string()],
        temperature: 0.7,
        max_tokens: 4096,
    }
}

async fn mount_structured(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/data/structured/generate"))
        .and(body_partial_json(json!({"stockId": "AAPL"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sections": {
                "cash_flow": {"title": "Cash Flow", "content": "..."}
            },
            "sectionOrder": ["cash_flow"]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_triggers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/triggers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "trig-1",
            "name": "Q2 earnings beat",
            "status": "active",
            "lastUpdated": "2025-08-01T09:30:00Z"
        }])))
        .mount(&server)
        .await;

    let triggers = client(&server).list_triggers().await.unwrap();
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].name, "Q2 earnings beat");
    assert_eq!(triggers[0].status, "active");
}

#[tokio::test]
async fn test_trigger_data_passes_stock_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/triggers/trig-1/data"))
        .and(query_param("stockId", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "article": "Existing article body",
            "publishedAt": "2025-07-30T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let data = client(&server).trigger_data("trig-1", "AAPL").await.unwrap();
    assert_eq!(data["article"], "Existing article body");
}

#[tokio::test]
async fn test_structured_data_becomes_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/data/structured/generate"))
        .and(body_partial_json(json!({"stockId": "AAPL"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sections": {
                "cash_flow": {"title": "Cash Flow", "content": "..."},
                "valuation": {"title": "Valuation", "content": "..."}
            },
            "sectionOrder": ["valuation", "cash_flow"]
        })))
        .mount(&server)
        .await;

    let data = client(&server)
        .generate_structured("AAPL", None, None)
        .await
        .unwrap();

    let catalog = data.to_catalog(DataMode::OldNew);
    let ids: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["existing_article", "valuation", "cash_flow"]);
}

#[tokio::test]
async fn test_remote_provider_uses_server_cost_and_latency() {
    let server = MockServer::start().await;
    mount_structured(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/news/generate"))
        .and(body_partial_json(json!({
            "triggerName": "Q2 earnings beat",
            "promptType": "paid",
            "modelId": "openai/gpt-4o"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generatedText": "Apple's cash flow strengthened...",
            "inputTokens": 1500,
            "outputTokens": 600,
            "totalTokens": 2100,
            "cost": 0.0123,
            "latencySeconds": 2.3,
            "modelName": "gpt-4o-2024-08-06",
            "provider": "openai",
            "timestamp": "2025-08-01T09:30:05Z"
        })))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(client(&server));
    let output = provider.generate(&generation_request()).await.unwrap();

    assert!(output.text.starts_with("Apple's"));
    assert_eq!(output.usage.total(), 2100);
    assert_eq!(output.model_name, "gpt-4o-2024-08-06");
    // Server figures win over local estimates
    assert!((output.cost_usd - 0.0123).abs() < 1e-12);
    assert_eq!(output.latency_ms, 2300);
}

#[tokio::test]
async fn test_remote_provider_falls_back_when_cost_omitted() {
    let server = MockServer::start().await;
    mount_structured(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/news/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generatedText": "text",
            "inputTokens": 1500,
            "outputTokens": 600,
            "modelName": "gpt-4o",
            "provider": "openai"
        })))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(client(&server));
    let output = provider.generate(&generation_request()).await.unwrap();

    // gpt-4o: 1500 in at $2.50/M + 600 out at $10/M
    assert!((output.cost_usd - 0.00975).abs() < 1e-9);
}

#[tokio::test]
async fn test_upstream_error_is_surfaced() {
    let server = MockServer::start().await;
    mount_structured(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/news/generate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(client(&server));
    let err = provider.generate(&generation_request()).await.unwrap_err();
    match err {
        ProviderError::Upstream(message) => {
            assert!(message.contains("502"));
            assert!(message.contains("model overloaded"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_structured_failure_stops_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/data/structured/generate"))
        .respond_with(ResponseTemplate::new(422).set_body_string("unknown stock"))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(client(&server));
    let err = provider.generate(&generation_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Upstream(_)));
}

#[tokio::test]
async fn test_config_save_and_publish() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "saved",
            "version": 3,
            "isActive": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/config/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "published",
            "version": 4,
            "isActive": true
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let payload = json!({"triggerId": "trig-1", "stockId": "AAPL"});

    let saved = api.save_config(&payload).await.unwrap();
    assert_eq!(saved.status, "saved");
    assert!(!saved.is_active);

    let published = api.publish_config(&payload).await.unwrap();
    assert_eq!(published.version, 4);
    assert!(published.is_active);
}

#[tokio::test]
async fn test_error_status_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config/publish"))
        .respond_with(ResponseTemplate::new(422).set_body_string("config incomplete"))
        .mount(&server)
        .await;

    let err = client(&server)
        .publish_config(&json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { code: 422, .. }));
}
