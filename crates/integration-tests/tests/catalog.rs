//! Catalog endpoints served from configuration

mod harness;

use errcode_config::RegistryConfig;
use harness::config::ConfigBuilder;
use harness::server::TestServer;

fn catalog() -> ConfigBuilder {
    ConfigBuilder::new()
        .with_code(100_404, 404, Some("user not found"))
        .with_code(100_400, 400, Some("invalid user id"))
        .with_code(100_503, 503, None)
}

#[tokio::test]
async fn lists_codes_in_order() {
    let server = TestServer::start(catalog().build()).await.unwrap();

    let (status, body) = server.get_json("/v1/codes").await;

    assert_eq!(status, 200);
    assert_eq!(body["code"], 200);
    assert_eq!(body["message"], "");

    let codes: Vec<u64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["code"].as_u64().unwrap())
        .collect();
    assert_eq!(codes, [100_400, 100_404, 100_503]);
    assert_eq!(body["data"][2]["message"], serde_json::Value::Null);
}

#[tokio::test]
async fn looks_up_one_code() {
    let server = TestServer::start(catalog().build()).await.unwrap();

    let (status, body) = server.get_json("/v1/codes/100404").await;

    assert_eq!(status, 200);
    assert_eq!(
        body["data"],
        serde_json::json!({ "code": 100_404, "http_status": 404, "message": "user not found" })
    );
}

#[tokio::test]
async fn unregistered_code_is_not_found() {
    let server = TestServer::start(catalog().build()).await.unwrap();

    let (status, body) = server.get_json("/v1/codes/100999").await;

    assert_eq!(status, 404);
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], "error code 100999 is not registered");
    assert_eq!(body["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn malformed_code_is_bad_request() {
    let server = TestServer::start(catalog().build()).await.unwrap();

    let (status, body) = server.get_json("/v1/codes/not-a-code").await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "invalid error code: not-a-code");
}

#[tokio::test]
async fn custom_success_code_is_reported() {
    let config = catalog()
        .with_registry(RegistryConfig {
            success_code: 0,
            ..RegistryConfig::default()
        })
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server.get_json("/v1/codes").await;

    assert_eq!(status, 200);
    assert_eq!(body["code"], 0);
}

#[tokio::test]
async fn catalog_disabled() {
    let server = TestServer::start(catalog().without_catalog().build()).await.unwrap();

    let resp = server.client().get(server.url("/v1/codes")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn duplicate_codes_fail_startup() {
    let config = ConfigBuilder::new()
        .with_code(100_001, 404, None)
        .with_code(100_001, 409, None)
        .build();

    let Err(err) = TestServer::start(config).await else {
        panic!("duplicate catalog entries must be rejected");
    };
    assert!(err.to_string().contains("already registered"), "{err}");
}
