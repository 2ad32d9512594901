//! Tests for the Clerk client against a mock Backend API.

use imaginify_core::error::SyncError;
use imaginify_core::traits::IdentityProvider;
use imaginify_plugin_clerk::{ClerkClient, ClerkConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ClerkClient {
    ClerkClient::new(ClerkConfig::new("sk_test_secret").api_url(format!("{}/v1", server.uri())))
        .expect("client should build")
}

#[tokio::test]
async fn test_update_public_metadata_sends_patch() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/user_2abc/metadata"))
        .and(header("authorization", "Bearer sk_test_secret"))
        .and(body_json(json!({ "public_metadata": { "userId": "rec_1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user_2abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .update_public_metadata("user_2abc", json!({ "userId": "rec_1" }))
        .await
        .expect("metadata update should succeed");
}

#[tokio::test]
async fn test_update_public_metadata_escapes_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/user%2F..%2Fsessions/metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update_public_metadata("user/../sessions", json!({ "userId": "rec_1" }))
        .await
        .expect("escaped id should hit the user endpoint");
}

#[tokio::test]
async fn test_update_public_metadata_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/user_missing/metadata"))
        .respond_with(ResponseTemplate::new(404).set_body_string("resource_not_found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .update_public_metadata("user_missing", json!({ "userId": "rec_1" }))
        .await
        .unwrap_err();

    match err {
        SyncError::IdentityProviderError { message } => {
            assert!(message.contains("404"));
            assert!(message.contains("resource_not_found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_provider_id() {
    let client = ClerkClient::new(ClerkConfig::new("sk_test_secret")).unwrap();
    assert_eq!(client.id(), "clerk");
}
