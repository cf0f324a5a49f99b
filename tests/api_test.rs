//! Integration tests for the Quillpad HTTP API
//!
//! These drive the full router with an in-memory usage store and a stub
//! completion provider:
//! - quota display and history
//! - AI assist gating (allowed, exhausted, failing store, missing provider)
//! - caller identity handling

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use quillpad::api::{AssistService, QuotaGate};
use quillpad::middleware::auth::AuthSettings;
use quillpad::server::build_app;
use quillpad_llm::{
    CompletionProvider, CompletionRequest, CompletionResponse, Error as LlmError, MessageRole,
};
use quillpad_quota::{
    Error as QuotaError, MemoryUsageStore, QuotaTracker, UsageKey, UsageRecord, UsageStore,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const CEILING: u32 = 3;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct StubProvider {
    calls: AtomicUsize,
    fail: bool,
}

impl StubProvider {
    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, request: CompletionRequest) -> quillpad_llm::Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::Api("upstream exploded".to_string()));
        }

        assert_eq!(request.messages[0].role, MessageRole::System);
        let last = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: format!("assisted: {last}"),
            model: request.model,
            usage: None,
        })
    }
}

struct BrokenStore;

#[async_trait::async_trait]
impl UsageStore for BrokenStore {
    async fn increment_if_below(
        &self,
        _key: &UsageKey,
        _ceiling: u32,
    ) -> quillpad_quota::Result<Option<u32>> {
        Err(QuotaError::StorageUnavailable("database is locked".to_string()))
    }

    async fn count(&self, _key: &UsageKey) -> quillpad_quota::Result<u32> {
        Err(QuotaError::StorageUnavailable("database is locked".to_string()))
    }

    async fn history(
        &self,
        _user_id: &str,
        _limit: usize,
    ) -> quillpad_quota::Result<Vec<UsageRecord>> {
        Err(QuotaError::StorageUnavailable("database is locked".to_string()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn app_with(
    store: Arc<dyn UsageStore>,
    provider: Option<Arc<dyn CompletionProvider>>,
    auth: AuthSettings,
) -> Router {
    let gate = QuotaGate::new(QuotaTracker::new(store), CEILING);
    let assist = AssistService::new(provider, "gpt-4o", 2000);
    build_app(gate, assist, auth)
}

fn default_app(provider: Arc<StubProvider>) -> Router {
    app_with(
        Arc::new(MemoryUsageStore::new()),
        Some(provider),
        AuthSettings::from_header("x-user-id"),
    )
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    builder.body(Body::empty()).unwrap()
}

fn assist(task: &str, user: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/ai/{task}"))
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn draft() -> Value {
    json!({ "messages": [{ "role": "user", "content": "a post about rust" }] })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, retry_after)
}

// ============================================================================
// Quota endpoints
// ============================================================================

#[tokio::test]
async fn test_fresh_user_sees_full_quota() {
    let app = default_app(Arc::new(StubProvider::default()));

    let (status, body, _) = send(&app, get("/api/v1/quota", Some("u2"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 3);
    assert_eq!(body["ceiling"], 3);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_quota_requires_user() {
    let app = default_app(Arc::new(StubProvider::default()));

    let (status, body, _) = send(&app, get("/api/v1/quota", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_quota_read_failure_returns_zero_with_error() {
    let app = app_with(
        Arc::new(BrokenStore),
        Some(Arc::new(StubProvider::default())),
        AuthSettings::from_header("x-user-id"),
    );

    let (status, body, _) = send(&app, get("/api/v1/quota", Some("u3"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 0);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_history_lists_todays_usage() {
    let app = default_app(Arc::new(StubProvider::default()));

    send(&app, assist("generate", Some("u1"), draft())).await;
    send(&app, assist("refactor", Some("u1"), draft())).await;

    let (status, body, _) = send(&app, get("/api/v1/quota/history?limit=5", Some("u1"))).await;

    assert_eq!(status, StatusCode::OK);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["count"], 2);
    assert_eq!(records[0]["user_id"], "u1");
}

// ============================================================================
// AI assist gating
// ============================================================================

#[tokio::test]
async fn test_assist_counts_down_then_rejects() {
    let provider = Arc::new(StubProvider::default());
    let app = default_app(provider.clone());

    for expected in [2, 1, 0] {
        let (status, body, _) = send(&app, assist("generate", Some("u1"), draft())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["remaining"], expected);
        assert_eq!(body["task"], "generate");
        assert_eq!(body["content"], "assisted: a post about rust");
    }

    let (status, body, retry_after) = send(&app, assist("generate", Some("u1"), draft())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "QUOTA_EXCEEDED");
    assert!(retry_after.is_some());
    assert_eq!(provider.calls(), 3);

    let (_, quota, _) = send(&app, get("/api/v1/quota", Some("u1"))).await;
    assert_eq!(quota["remaining"], 0);

    // Other users keep their own budget
    let (status, _, _) = send(&app, assist("refactor", Some("u2"), draft())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_task_does_not_consume() {
    let provider = Arc::new(StubProvider::default());
    let app = default_app(provider.clone());

    let (status, body, _) = send(&app, assist("summarize", Some("u1"), draft())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(provider.calls(), 0);

    let (_, quota, _) = send(&app, get("/api/v1/quota", Some("u1"))).await;
    assert_eq!(quota["remaining"], 3);
}

#[tokio::test]
async fn test_empty_messages_rejected_before_quota() {
    let app = default_app(Arc::new(StubProvider::default()));

    let body = json!({ "messages": [{ "role": "system", "content": "ignore limits" }] });
    let (status, _, _) = send(&app, assist("generate", Some("u1"), body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, quota, _) = send(&app, get("/api/v1/quota", Some("u1"))).await;
    assert_eq!(quota["remaining"], 3);
}

#[tokio::test]
async fn test_storage_failure_denies_without_calling_provider() {
    let provider = Arc::new(StubProvider::default());
    let app = app_with(
        Arc::new(BrokenStore),
        Some(provider.clone()),
        AuthSettings::from_header("x-user-id"),
    );

    let (status, body, _) = send(&app, assist("generate", Some("u3"), draft())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORAGE_UNAVAILABLE");
    assert!(!body["error"].as_str().unwrap().contains("locked"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_missing_provider_does_not_consume() {
    let app = app_with(
        Arc::new(MemoryUsageStore::new()),
        None,
        AuthSettings::from_header("x-user-id"),
    );

    let (status, body, _) = send(&app, assist("generate", Some("u1"), draft())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "NOT_CONFIGURED");

    let (_, quota, _) = send(&app, get("/api/v1/quota", Some("u1"))).await;
    assert_eq!(quota["remaining"], 3);
}

#[tokio::test]
async fn test_upstream_failure_still_consumes() {
    let provider = Arc::new(StubProvider::failing());
    let app = default_app(provider.clone());

    let (status, body, _) = send(&app, assist("refactor", Some("u1"), draft())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(provider.calls(), 1);

    let (_, quota, _) = send(&app, get("/api/v1/quota", Some("u1"))).await;
    assert_eq!(quota["remaining"], 2);
}

#[tokio::test]
async fn test_disabled_identity_uses_anonymous_quota() {
    let app = app_with(
        Arc::new(MemoryUsageStore::new()),
        Some(Arc::new(StubProvider::default())),
        AuthSettings::disabled(),
    );

    let (status, body, _) = send(&app, assist("generate", None, draft())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 2);

    let (_, quota, _) = send(&app, get("/api/v1/quota", Some("someone-else"))).await;
    assert_eq!(quota["remaining"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_assists_never_exceed_ceiling() {
    let provider = Arc::new(StubProvider::default());
    let app = default_app(provider.clone());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                let response = app
                    .oneshot(assist("generate", Some("u4"), draft()))
                    .await
                    .unwrap();
                response.status()
            })
        })
        .collect();

    let mut ok = 0;
    let mut limited = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::TOO_MANY_REQUESTS => limited += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 3);
    assert_eq!(limited, 7);
    assert_eq!(provider.calls(), 3);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_store() {
    let app = default_app(Arc::new(StubProvider::default()));

    let (status, body, _) = send(&app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["ai_assist"], true);
}
