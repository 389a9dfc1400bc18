//! Tests for the Harvest backend client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real backend.

use harvest_client::{BackendConfig, ClientError, HarvestClient};
use harvest_core::{AuthState, FieldFilter, HarvestError, IdentityProvider, DocumentStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth_body(uid: &str, token: &str) -> serde_json::Value {
    json!({
        "localId": uid,
        "idToken": token,
        "refreshToken": "refresh",
        "email": "user@example.com",
        "expiresIn": "3600"
    })
}

async fn signed_in_client(server: &MockServer) -> HarvestClient {
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("uid-1", "token-1")))
        .mount(server)
        .await;

    let client = HarvestClient::new(BackendConfig::new(server.uri())).unwrap();
    client.sign_in("user@example.com", "secret").await.unwrap();
    client
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        let result = HarvestClient::new(BackendConfig::new(""));

        match result {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        let result = HarvestClient::new(BackendConfig::new("backend.example.com"));

        match result {
            Err(ClientError::InvalidUrl(msg)) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[tokio::test]
    async fn test_url_normalization_multiple_trailing_slashes() {
        let client = HarvestClient::new(BackendConfig::new("https://example.com///")).unwrap();
        assert_eq!(client.url().await, "https://example.com");
    }
}

// =============================================================================
// Account Tests
// =============================================================================

mod accounts {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_stores_token_and_publishes_state() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .and(query_param("key", "api-key"))
            .and(body_json(json!({
                "email": "buyer@example.com",
                "password": "secret",
                "returnSecureToken": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("uid-7", "tok")))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            HarvestClient::new(BackendConfig::new(server.uri()).api_key("api-key")).unwrap();
        let mut auth = client.auth_state();
        assert_eq!(*auth.borrow_and_update(), AuthState::SignedOut);

        let response = client.sign_in("buyer@example.com", "secret").await.unwrap();
        assert_eq!(response.local_id, "uid-7");
        assert!(client.is_authenticated().await);

        assert!(auth.has_changed().unwrap());
        let state = auth.borrow_and_update().clone();
        assert_eq!(state.user().unwrap().uid.as_str(), "uid-7");
    }

    #[tokio::test]
    async fn test_sign_in_rejected_keeps_provider_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
            })))
            .mount(&server)
            .await;

        let client = HarvestClient::new(BackendConfig::new(server.uri())).unwrap();
        let err = client.sign_in("x@example.com", "wrong").await.unwrap_err();

        match err {
            ClientError::AuthFailed(msg) => assert_eq!(msg, "INVALID_LOGIN_CREDENTIALS"),
            e => panic!("Expected AuthFailed, got: {:?}", e),
        }
        assert!(!client.is_authenticated().await);
        assert_eq!(client.current_state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_duplicate_account_through_trait_is_credential_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "EMAIL_EXISTS" }
            })))
            .mount(&server)
            .await;

        let client = HarvestClient::new(BackendConfig::new(server.uri())).unwrap();
        let creds = harvest_core::Credentials::new("dup@example.com", "secret");
        let err = client.create_account(&creds).await.unwrap_err();

        assert!(matches!(err, HarvestError::Credential(ref m) if m == "EMAIL_EXISTS"));
    }

    #[tokio::test]
    async fn test_sign_out_clears_token() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server).await;
        let mut auth = client.auth_state();

        client.sign_out().await;

        assert!(!client.is_authenticated().await);
        assert_eq!(*auth.borrow_and_update(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_server_error_on_sign_up() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = HarvestClient::new(BackendConfig::new(server.uri())).unwrap();
        match client.sign_up("a@example.com", "pw").await.unwrap_err() {
            ClientError::ServerError { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("Internal Server Error"));
            }
            e => panic!("Expected ServerError, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let client = HarvestClient::new(BackendConfig::new("http://127.0.0.1:1")).unwrap();

        match client.sign_in("a@example.com", "pw").await.unwrap_err() {
            ClientError::ServerUnreachable(_) | ClientError::Request(_) => {}
            e => panic!("Expected ServerUnreachable or Request error, got: {:?}", e),
        }
    }
}

// =============================================================================
// Session Restore Tests
// =============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn test_restore_session_with_valid_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .and(body_json(json!({ "idToken": "saved" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{ "localId": "uid-3", "email": "b@example.com" }]
            })))
            .mount(&server)
            .await;

        let client = HarvestClient::new(BackendConfig::with_token(server.uri(), "saved")).unwrap();
        let user = client.restore_session().await.unwrap().unwrap();

        assert_eq!(user.uid.as_str(), "uid-3");
        assert!(client.current_state().is_signed_in());
        assert!(client.validate_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_session_with_expired_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "INVALID_ID_TOKEN" }
            })))
            .mount(&server)
            .await;

        let client =
            HarvestClient::new(BackendConfig::with_token(server.uri(), "expired")).unwrap();

        assert!(client.restore_session().await.unwrap().is_none());
        assert!(!client.is_authenticated().await);
        assert_eq!(client.current_state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_restore_session_without_token() {
        let client = HarvestClient::new(BackendConfig::new("https://example.com")).unwrap();
        assert!(client.restore_session().await.unwrap().is_none());
        assert!(!client.validate_token().await.unwrap());
    }
}

// =============================================================================
// Document Tests
// =============================================================================

mod documents {
    use super::*;

    #[tokio::test]
    async fn test_read_document() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/documents/users/uid-1"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "uid-1",
                "fields": { "userType": "buyer", "businessName": "Green Grocers" }
            })))
            .mount(&server)
            .await;

        let doc = client.read_document("users", "uid-1").await.unwrap().unwrap();
        assert_eq!(doc.id, "uid-1");
        assert_eq!(doc.fields["businessName"], "Green Grocers");
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/documents/users/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client.get_document("users", "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_requires_sign_in() {
        let client = HarvestClient::new(BackendConfig::new("https://example.com")).unwrap();

        match client.run_query("crops", &[]).await.unwrap_err() {
            ClientError::AuthRequired => {}
            e => panic!("Expected AuthRequired, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_write_document_sends_fields() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/v1/documents/users/uid-1"))
            .and(body_json(json!({ "fields": { "userType": "farmer" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut fields = serde_json::Map::new();
        fields.insert("userType".into(), json!("farmer"));
        client.write_document("users", "uid-1", fields).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_sends_predicate_and_returns_documents() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/v1/documents:runQuery"))
            .and(body_json(json!({
                "collection": "crops",
                "where": [{ "field": "status", "op": "EQUAL", "value": "available" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    { "id": "c1", "fields": { "cropName": "Wheat", "status": "available" } },
                    { "id": "c2", "fields": { "cropName": "Rice", "status": "available" } }
                ]
            })))
            .mount(&server)
            .await;

        let docs = client
            .query("crops", &[FieldFilter::eq("status", "available")])
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].id, "c2");
    }

    #[tokio::test]
    async fn test_query_failure_maps_to_store_error() {
        let server = MockServer::start().await;
        let client = signed_in_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/v1/documents:runQuery"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": { "code": 503, "message": "UNAVAILABLE" }
            })))
            .mount(&server)
            .await;

        let err = client.query("crops", &[]).await.unwrap_err();
        assert!(matches!(err, HarvestError::Store(ref m) if m.contains("UNAVAILABLE")));
    }
}
