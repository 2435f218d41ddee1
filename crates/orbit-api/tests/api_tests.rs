//! API integration tests.
//!
//! Routes run against the in-memory store and a stub token verifier.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use orbit_api::auth::AuthError;
use orbit_api::{create_router, ApiConfig, AppState, TokenVerifier, VerifiedIdentity};
use orbit_models::{Collection, Document};
use orbit_store::{DocumentStore, MemoryStore};

const VALID_TOKEN: &str = "valid-token";

/// Accepts exactly one token and counts every call.
#[derive(Default)]
struct StubVerifier {
    calls: AtomicUsize,
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token == VALID_TOKEN {
            Ok(VerifiedIdentity {
                uid: "uid-1".to_string(),
                email: Some("client@orbit.dev".to_string()),
                email_verified: true,
            })
        } else {
            Err(AuthError::InvalidToken("bad signature".to_string()))
        }
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    verifier: Arc<StubVerifier>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let verifier = Arc::new(StubVerifier::default());
        let state = AppState::with_components(ApiConfig::default(), store.clone(), verifier.clone());
        Self {
            router: create_router(state, None),
            store,
            verifier,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN));
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: Value) -> Response {
        self.authed(Method::POST, uri, Some(body)).await
    }

    async fn count(&self, collection: Collection) -> u64 {
        self.store.count(collection, Document::new()).await.unwrap()
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn inserted_id(response: Response) -> String {
    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["acknowledged"], json!(true));
    ack["insertedId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_root_banner() {
    let app = TestApp::new();
    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Work Orbit server is running.");
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");

    let response = app.get("/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_mutations_without_token_are_rejected() {
    let app = TestApp::new();
    let id = "65a1f0c2e4b0a1b2c3d4e5f6";

    let cases = [
        (Method::POST, "/users".to_string()),
        (Method::POST, "/allJobs".to_string()),
        (Method::PATCH, format!("/allJobs/{}", id)),
        (Method::DELETE, format!("/allJobs/{}", id)),
        (Method::POST, "/someJobs".to_string()),
        (Method::POST, "/myTasks".to_string()),
        (Method::DELETE, format!("/myTasks/{}", id)),
        (Method::POST, "/myAddedJobs".to_string()),
        (Method::PATCH, format!("/myAddedJobs/{}", id)),
        (Method::DELETE, format!("/myAddedJobs/{}", id)),
    ];

    for (method, uri) in cases {
        let request = Request::builder()
            .method(method.clone())
            .uri(&uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"x","email":"a@b.c"}"#))
            .unwrap();
        let response = app.send(request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Unauthorized Access!" })
        );
    }

    // Rejected before the identity provider is consulted
    assert_eq!(app.verifier.calls.load(Ordering::SeqCst), 0);
    for collection in Collection::ALL {
        assert_eq!(app.count(collection).await, 0);
    }
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new();

    for auth in ["Bearer forged-token", "Basic dXNlcjpwYXNz", "Bearer "] {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/allJobs")
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"x"}"#))
            .unwrap();
        let response = app.send(request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", auth);
        assert_eq!(body_json(response).await["message"], "Unauthorized Access!");
    }

    // Only the well-formed bearer header reached the verifier
    assert_eq!(app.verifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.count(Collection::AllJobs).await, 0);
}

#[tokio::test]
async fn test_create_then_get_job() {
    let app = TestApp::new();
    let job = json!({
        "title": "Fix the roof",
        "category": "Construction",
        "summary": "Leaky roof over the garage",
        "coverImage": "https://img.example/roof.png",
        "userEmail": "client@orbit.dev",
        "postedAt": "2024-03-01T10:00:00Z",
        "budget": 250
    });

    let id = inserted_id(app.post("/allJobs", job.clone()).await).await;

    let response = app.get(&format!("/allJobs/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut expected = job;
    expected["_id"] = json!(id);
    assert_eq!(body_json(response).await, expected);
}

#[tokio::test]
async fn test_get_missing_document_returns_null() {
    let app = TestApp::new();
    let response = app.get("/someJobs/65a1f0c2e4b0a1b2c3d4e5f6").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Null);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = TestApp::new();

    for uri in ["/allJobs/not-an-id", "/someJobs/123", "/myAddedJobs/zzzzzzzzzzzzzzzzzzzzzzzz"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body_json(response).await["message"].is_string());
    }

    let response = app.authed(Method::DELETE, "/myTasks/not-an-id", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .authed(Method::PATCH, "/allJobs/not-an-id", Some(json!({ "title": "t" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_all_jobs_sorted_newest_first_and_filtered() {
    let app = TestApp::new();
    let jobs = [
        ("middle", "2024-02-01T00:00:00Z", "a@orbit.dev"),
        ("oldest", "2024-01-01T00:00:00Z", "b@orbit.dev"),
        ("newest", "2024-03-01T00:00:00Z", "a@orbit.dev"),
    ];
    for (title, posted_at, email) in jobs {
        app.post(
            "/allJobs",
            json!({ "title": title, "postedAt": posted_at, "userEmail": email }),
        )
        .await;
    }

    let listed = body_json(app.get("/allJobs").await).await;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);

    let listed = body_json(app.get("/allJobs?email=a@orbit.dev").await).await;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["newest", "middle"]);

    let listed = body_json(app.get("/allJobs?email=nobody@orbit.dev").await).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_featured_jobs_are_six_most_recent() {
    let app = TestApp::new();
    for i in 0..8 {
        app.post("/someJobs", json!({ "title": format!("job-{}", i) }))
            .await;
    }

    let listed = body_json(app.get("/someJobs").await).await;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["job-7", "job-6", "job-5", "job-4", "job-3", "job-2"]);
    assert_eq!(app.count(Collection::SomeJobs).await, 8);
}

#[tokio::test]
async fn test_self_acceptance_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post(
            "/myTasks",
            json!({
                "jobId": "65a1f0c2e4b0a1b2c3d4e5f6",
                "workerEmail": "same@orbit.dev",
                "clientEmail": "same@orbit.dev"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "You cannot accept your own posted job." })
    );
    assert_eq!(app.count(Collection::Tasks).await, 0);
}

#[tokio::test]
async fn test_accept_task_and_list_by_worker() {
    let app = TestApp::new();

    let task_id = inserted_id(
        app.post(
            "/myTasks",
            json!({
                "title": "Fix the roof",
                "workerEmail": "worker@orbit.dev",
                "clientEmail": "client@orbit.dev"
            }),
        )
        .await,
    )
    .await;

    let listed = body_json(app.get("/myTasks?email=worker@orbit.dev").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["_id"], json!(task_id));

    // Tasks filter on the worker, not the client
    let listed = body_json(app.get("/myTasks?email=client@orbit.dev").await).await;
    assert_eq!(listed, json!([]));

    let response = app
        .authed(Method::DELETE, &format!("/myTasks/{}", task_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "acknowledged": true, "deletedCount": 1 })
    );
    assert_eq!(app.count(Collection::Tasks).await, 0);
}

#[tokio::test]
async fn test_duplicate_user_is_not_inserted() {
    let app = TestApp::new();
    let user = json!({ "email": "client@orbit.dev", "name": "Client" });

    inserted_id(app.post("/users", user.clone()).await).await;

    let response = app.post("/users", user).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "User Already Exist!");

    assert_eq!(app.count(Collection::Users).await, 1);
}

#[tokio::test]
async fn test_patch_sets_only_editable_fields() {
    let app = TestApp::new();
    let id = inserted_id(
        app.post(
            "/myAddedJobs",
            json!({
                "title": "Old title",
                "category": "Old category",
                "summary": "Old summary",
                "coverImage": "old.png",
                "userEmail": "client@orbit.dev",
                "deadline": "2024-05-01"
            }),
        )
        .await,
    )
    .await;

    let response = app
        .authed(
            Method::PATCH,
            &format!("/myAddedJobs/{}", id),
            Some(json!({
                "title": "New title",
                "category": "New category",
                "summary": "New summary",
                "coverImage": "new.png",
                "userEmail": "someone-else@orbit.dev",
                "deadline": "2030-01-01"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["matchedCount"], json!(1));
    assert_eq!(ack["modifiedCount"], json!(1));

    let job = body_json(app.get(&format!("/myAddedJobs/{}", id)).await).await;
    assert_eq!(job["title"], "New title");
    assert_eq!(job["category"], "New category");
    assert_eq!(job["summary"], "New summary");
    assert_eq!(job["coverImage"], "new.png");
    assert_eq!(job["userEmail"], "client@orbit.dev");
    assert_eq!(job["deadline"], "2024-05-01");
}

#[tokio::test]
async fn test_patch_missing_document_matches_nothing() {
    let app = TestApp::new();

    let response = app
        .authed(
            Method::PATCH,
            "/allJobs/65a1f0c2e4b0a1b2c3d4e5f6",
            Some(json!({ "title": "t", "category": "c", "summary": "s", "coverImage": "i" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["matchedCount"], json!(0));
    assert_eq!(ack["modifiedCount"], json!(0));
    assert_eq!(app.count(Collection::AllJobs).await, 0);
}

#[tokio::test]
async fn test_delete_twice_reports_zero() {
    let app = TestApp::new();
    let id = inserted_id(app.post("/allJobs", json!({ "title": "t" })).await).await;
    let uri = format!("/allJobs/{}", id);

    let first = body_json(app.authed(Method::DELETE, &uri, None).await).await;
    assert_eq!(first["deletedCount"], json!(1));

    let second = body_json(app.authed(Method::DELETE, &uri, None).await).await;
    assert_eq!(second["deletedCount"], json!(0));

    assert_eq!(body_json(app.get(&uri).await).await, Value::Null);
}

#[tokio::test]
async fn test_added_jobs_are_independent_of_all_jobs() {
    let app = TestApp::new();
    inserted_id(
        app.post(
            "/myAddedJobs",
            json!({ "title": "Mine", "userEmail": "client@orbit.dev" }),
        )
        .await,
    )
    .await;

    let added = body_json(app.get("/myAddedJobs?email=client@orbit.dev").await).await;
    assert_eq!(added.as_array().unwrap().len(), 1);
    assert_eq!(body_json(app.get("/allJobs").await).await, json!([]));
}

#[tokio::test]
async fn test_integer_beyond_i64_is_stored_as_double() {
    let app = TestApp::new();
    let id = inserted_id(
        app.post("/allJobs", json!({ "title": "t", "budget": u64::MAX }))
            .await,
    )
    .await;

    let job = body_json(app.get(&format!("/allJobs/{}", id)).await).await;
    assert_eq!(job["title"], "t");
    assert_eq!(job["budget"].as_f64(), Some(u64::MAX as f64));
}

#[tokio::test]
async fn test_non_object_body_is_bad_request() {
    let app = TestApp::new();
    let response = app.post("/allJobs", json!([1, 2, 3])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count(Collection::AllJobs).await, 0);
}

#[tokio::test]
async fn test_unsupported_method_and_unknown_path() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/allJobs")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status(), StatusCode::METHOD_NOT_ALLOWED);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/someJobs/65a1f0c2e4b0a1b2c3d4e5f6")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status(), StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(app.get("/jobs").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/allJobs")
        .header("X-Request-ID", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    let headers = response.headers();
    assert_eq!(headers["X-Content-Type-Options"], "nosniff");
    assert_eq!(headers["X-Frame-Options"], "DENY");
    assert_eq!(headers["X-Request-ID"], "req-123");
}
