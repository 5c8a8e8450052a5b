//! Request wrapper and namespaces against the mock content API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use aigenthix_admin::api::{
    ApiClient, ApiErrorKind, AuthApi, BlogsApi, BulkAction, DEFAULT_TIMEOUT, UploadFile,
};
use aigenthix_admin::storage::{CredentialStore, FileStore, MemoryStore};
use aigenthix_core::{AuthToken, BlogFormData, BlogId, Email, LoginRequest};
use aigenthix_integration_tests::{MOCK_TOKEN, MockApi};

fn blogs(api: &MockApi, store: Arc<dyn CredentialStore>) -> BlogsApi {
    BlogsApi::new(ApiClient::new(&api.url(), DEFAULT_TIMEOUT, store))
}

fn signed_in(api: &MockApi) -> BlogsApi {
    blogs(api, Arc::new(MemoryStore::with_token(&AuthToken::new(MOCK_TOKEN))))
}

fn login_request(email: &str) -> LoginRequest {
    LoginRequest::new(Email::parse(email).unwrap(), "hunter22")
}

// =============================================================================
// Authorization header
// =============================================================================

#[tokio::test]
async fn test_protected_call_without_credential_omits_authorization() {
    let api = MockApi::start().await;
    blogs(&api, Arc::new(MemoryStore::new()))
        .get_all()
        .await
        .unwrap();
    assert_eq!(api.authorizations(), vec![None]);
}

#[tokio::test]
async fn test_stored_credential_is_sent_as_bearer() {
    let api = MockApi::start().await;
    signed_in(&api).get_all().await.unwrap();
    assert_eq!(
        api.authorizations(),
        vec![Some(format!("Bearer {MOCK_TOKEN}"))]
    );
}

#[tokio::test]
async fn test_login_never_sends_authorization() {
    let api = MockApi::start().await;
    let store = Arc::new(MemoryStore::with_token(&AuthToken::new("stale")));
    let auth = AuthApi::new(ApiClient::new(&api.url(), DEFAULT_TIMEOUT, store));
    auth.login(&login_request("editor@aigenthix.com"))
        .await
        .unwrap();
    assert_eq!(api.authorizations(), vec![None]);
}

#[tokio::test]
async fn test_json_requests_declare_json_content_type() {
    let api = MockApi::start().await;
    let blogs = signed_in(&api);
    blogs.get_all().await.unwrap();
    let form = BlogFormData {
        title: "Launch".to_string(),
        content: "Body".to_string(),
        ..BlogFormData::default()
    };
    blogs.create(&form).await.unwrap();
    blogs.toggle_featured(BlogId::new(42)).await.unwrap();

    let json = Some("application/json".to_string());
    assert_eq!(api.content_types(), vec![json.clone(), json.clone(), json]);
}

// =============================================================================
// Envelope and status handling
// =============================================================================

#[tokio::test]
async fn test_envelope_success_yields_data() {
    let api = MockApi::start().await;
    let blog = signed_in(&api).get_by_id(BlogId::new(5)).await.unwrap();
    assert_eq!(blog.slug, "post-5");
    assert_eq!(blog.read_time, 3);
}

#[tokio::test]
async fn test_envelope_failure_under_2xx_is_an_error() {
    let api = MockApi::start().await;
    let err = signed_in(&api)
        .get_by_id(BlogId::new(409))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Rejected);
    assert_eq!(err.message(), "Slug taken");
    assert_eq!(err.endpoint(), "/api/admin/blogs/409");
}

#[tokio::test]
async fn test_status_failure_uses_body_error() {
    let api = MockApi::start().await;
    let err = signed_in(&api)
        .get_by_id(BlogId::new(404))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Status);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "Blog not found");
}

#[tokio::test]
async fn test_mutations_round_trip() {
    let api = MockApi::start().await;
    let blogs = signed_in(&api);

    let form = BlogFormData {
        title: "Launch".to_string(),
        content: "Body".to_string(),
        ..BlogFormData::default()
    };
    let created = blogs.create(&form).await.unwrap();
    assert_eq!(created.id, BlogId::new(42));

    blogs.delete(BlogId::new(42)).await.unwrap();
    assert!(blogs.toggle_publish(BlogId::new(42)).await.unwrap().published);

    let ids = [BlogId::new(1), BlogId::new(2)];
    let affected = blogs.bulk(BulkAction::Unpublish, &ids).await.unwrap();
    assert_eq!(affected.affected, 2);
}

// =============================================================================
// Timeout versus network failure
// =============================================================================

#[tokio::test]
async fn test_timeout_reports_timeout_not_network() {
    let api = MockApi::start().await;
    let store = Arc::new(MemoryStore::with_token(&AuthToken::new(MOCK_TOKEN)));
    let blogs = BlogsApi::new(ApiClient::new(
        &api.url(),
        Duration::from_millis(200),
        store,
    ));
    let err = blogs.get_by_id(BlogId::new(504)).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.message(), "Request timed out. Please try again.");
}

#[tokio::test]
async fn test_unreachable_api_reports_network() {
    let err = BlogsApi::new(ApiClient::new(
        "http://127.0.0.1:1",
        DEFAULT_TIMEOUT,
        Arc::new(MemoryStore::new()),
    ))
    .get_all()
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.message(), "Network error. Please check your connection.");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_persists_credential_to_file_store() {
    let api = MockApi::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = AuthApi::new(ApiClient::new(
        &api.url(),
        DEFAULT_TIMEOUT,
        Arc::new(FileStore::in_dir(dir.path())),
    ));

    let response = auth
        .login(&login_request("editor@aigenthix.com"))
        .await
        .unwrap();
    auth.save_auth(&response.token, &response.user).unwrap();

    // A fresh store over the same directory sees the credential
    let reopened = FileStore::in_dir(dir.path());
    assert_eq!(reopened.token().unwrap().expose(), MOCK_TOKEN);

    let auth = AuthApi::new(ApiClient::new(
        &api.url(),
        DEFAULT_TIMEOUT,
        Arc::new(reopened),
    ));
    assert_eq!(auth.stored_user().unwrap().name, "Editor");

    auth.clear_auth().unwrap();
    assert!(auth.token().is_none());
    assert!(auth.stored_user().is_none());
}

#[tokio::test]
async fn test_login_non_json_is_invalid_response() {
    let api = MockApi::start().await;
    let auth = AuthApi::new(ApiClient::new(
        &api.url(),
        DEFAULT_TIMEOUT,
        Arc::new(MemoryStore::new()),
    ));
    let err = auth
        .login(&login_request("plain@aigenthix.com"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Invalid login response from server");
}

#[tokio::test]
async fn test_login_without_token_is_unexpected_response() {
    let api = MockApi::start().await;
    let auth = AuthApi::new(ApiClient::new(
        &api.url(),
        DEFAULT_TIMEOUT,
        Arc::new(MemoryStore::new()),
    ));
    let err = auth
        .login(&login_request("partial@aigenthix.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::InvalidResponse);
    assert_eq!(err.message(), "Unexpected login response from server");
}

#[tokio::test]
async fn test_login_refused_uses_detail() {
    let api = MockApi::start().await;
    let auth = AuthApi::new(ApiClient::new(
        &api.url(),
        DEFAULT_TIMEOUT,
        Arc::new(MemoryStore::new()),
    ));
    let err = auth
        .login(&login_request("intruder@aigenthix.com"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Invalid credentials");
}

// =============================================================================
// Image upload
// =============================================================================

fn png(name: &str) -> UploadFile {
    UploadFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

#[tokio::test]
async fn test_upload_sends_file_part_with_bearer() {
    let api = MockApi::start().await;
    let uploaded = signed_in(&api)
        .upload_image(png("cover.png"))
        .await
        .unwrap();
    assert_eq!(uploaded.url, "https://cdn.aigenthix.com/uploads/cover.png");

    assert_eq!(
        api.authorizations(),
        vec![Some(format!("Bearer {MOCK_TOKEN}"))]
    );
    let content_type = api.content_types().remove(0).unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_upload_rejection_uses_envelope_error() {
    let api = MockApi::start().await;
    let err = signed_in(&api)
        .upload_image(png("reject.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Rejected);
    assert_eq!(err.message(), "Unsupported image");
    assert_eq!(err.endpoint(), "/api/admin/upload/image");
}

#[tokio::test]
async fn test_upload_rejection_without_error_falls_back() {
    let api = MockApi::start().await;
    let err = signed_in(&api)
        .upload_image(png("silent.png"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Upload failed");
}

#[tokio::test]
async fn test_upload_timeout_has_upload_message() {
    let api = MockApi::start().await;
    let store = Arc::new(MemoryStore::with_token(&AuthToken::new(MOCK_TOKEN)));
    let blogs = BlogsApi::new(ApiClient::new(
        &api.url(),
        Duration::from_millis(200),
        store,
    ));
    let err = blogs.upload_image(png("slow.png")).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.message(), "Upload timed out. Please try again.");
}

#[tokio::test]
async fn test_upload_to_unreachable_api_reports_network() {
    let err = BlogsApi::new(ApiClient::new(
        "http://127.0.0.1:1",
        DEFAULT_TIMEOUT,
        Arc::new(MemoryStore::with_token(&AuthToken::new(MOCK_TOKEN))),
    ))
    .upload_image(png("cover.png"))
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.message(), "Network error during upload.");
}
