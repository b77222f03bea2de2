//! End-to-end HTTP tests against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use subscriptions_api::config::CorsConfig;
use subscriptions_api::server::{self, App};
use subscriptions_api::{AppState, Subscriptions};
use subscriptions_core::{
    Subscription, SubscriptionError, SubscriptionRepository, SubscriptionResult,
    SubscriptionUpdate, SumFilter,
};
use subscriptions_db::MemorySubscriptionRepository;

// =============================================================================
// Helpers
// =============================================================================

fn app_with(repository: Arc<dyn SubscriptionRepository>) -> App {
    let state = AppState::new(Arc::new(Subscriptions::new(repository)));
    server::app(state, &CorsConfig::default()).unwrap()
}

fn memory_app() -> App {
    app_with(Arc::new(MemorySubscriptionRepository::new()))
}

async fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &App, body: Value) -> Uuid {
    let (status, response) = send(app, Method::POST, "/subscriptions", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    response["id"].as_str().unwrap().parse().unwrap()
}

async fn get(app: &App, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

fn netflix(user_id: Uuid) -> Value {
    json!({
        "service_name": "Netflix",
        "price": 100,
        "user_id": user_id,
        "start_date": "01-2024"
    })
}

fn bad_request() -> Value {
    json!({ "message": "bad request" })
}

fn internal_error() -> Value {
    json!({ "message": "internal server error" })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = memory_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "ok" }));
}

// =============================================================================
// Create / Get
// =============================================================================

#[tokio::test]
async fn test_create_then_get() {
    let app = memory_app();
    let user_id = Uuid::new_v4();

    let (status, body) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({
            "service_name": "Yandex Plus",
            "price": 400,
            "user_id": user_id,
            "start_date": "07-2025"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "subscription was successfully created");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/subscriptions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": id,
            "service_name": "Yandex Plus",
            "price": 400,
            "user_id": user_id,
            "start_date": "07-2025"
        })
    );
}

#[tokio::test]
async fn test_create_rejects_bad_dates() {
    let app = memory_app();
    let user_id = Uuid::new_v4();

    for start_date in ["2024-01", "13-2024", "1-2024", ""] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/subscriptions",
            Some(json!({
                "service_name": "Netflix",
                "price": 100,
                "user_id": user_id,
                "start_date": start_date
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "start_date {start_date:?}");
        assert_eq!(body, bad_request());
    }
}

#[tokio::test]
async fn test_create_rejects_end_before_start_and_negative_price() {
    let app = memory_app();
    let user_id = Uuid::new_v4();

    let (status, _) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({
            "service_name": "Netflix",
            "price": 100,
            "user_id": user_id,
            "start_date": "05-2024",
            "end_date": "04-2024"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({
            "service_name": "Netflix",
            "price": -1,
            "user_id": user_id,
            "start_date": "05-2024"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = memory_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/subscriptions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"service_name\":"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({ "service_name": "Netflix", "price": "cheap" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({ "service_name": "Netflix", "price": 100, "start_date": "01-2024" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "missing user_id");
}

#[tokio::test]
async fn test_create_strips_markup() {
    let app = memory_app();
    let id = create(
        &app,
        json!({
            "service_name": "Netflix<script>alert(1)</script>",
            "price": 100,
            "user_id": Uuid::new_v4(),
            "start_date": "01-2024"
        }),
    )
    .await;

    let (_, body) = send(&app, Method::GET, &format!("/subscriptions/{id}"), None).await;
    assert_eq!(body["service_name"], "Netflix");
}

#[tokio::test]
async fn test_get_invalid_and_unknown_id() {
    let app = memory_app();

    let (status, body) = send(&app, Method::GET, "/subscriptions/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, bad_request());

    let (status, _) = get(&app, &format!("/subscriptions/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = create(&app, netflix(Uuid::new_v4())).await;
    let (status, _) = get(&app, &format!("/subscriptions/{id}%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "padded id");
}

#[tokio::test]
async fn test_create_rejects_padded_values() {
    let app = memory_app();
    let user_id = Uuid::new_v4();

    let mut padded_date = netflix(user_id);
    padded_date["start_date"] = json!(" 01-2024 ");
    let (status, body) = send(&app, Method::POST, "/subscriptions", Some(padded_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, bad_request());

    let mut padded_id = netflix(user_id);
    padded_id["user_id"] = json!(format!(" {user_id} "));
    let (status, _) = send(&app, Method::POST, "/subscriptions", Some(padded_id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// List / Sum
// =============================================================================

#[tokio::test]
async fn test_list_by_user() {
    let app = memory_app();
    let user_id = Uuid::new_v4();
    for (name, start) in [("Netflix", "03-2024"), ("Spotify", "01-2024")] {
        let mut body = netflix(user_id);
        body["service_name"] = json!(name);
        body["start_date"] = json!(start);
        create(&app, body).await;
    }

    let (status, body) = get(&app, &format!("/subscriptions?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|sub| sub["service_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Spotify", "Netflix"]);

    let (status, _) = get(&app, &format!("/subscriptions?user_id={}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unknown user");

    let (status, _) = get(&app, &format!("/subscriptions?user_id=%20{user_id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "padded user_id");

    let (status, _) = send(&app, Method::GET, "/subscriptions", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "missing user_id");
}

#[tokio::test]
async fn test_price_sum_with_filters() {
    let app = memory_app();
    let user_id = Uuid::new_v4();
    for (name, price, start, end) in [
        ("Netflix", 100, "01-2024", Some("06-2024")),
        ("Spotify", 200, "03-2024", None),
        ("Netflix", 300, "07-2024", Some("12-2024")),
    ] {
        create(
            &app,
            json!({
                "service_name": name,
                "price": price,
                "user_id": user_id,
                "start_date": start,
                "end_date": end
            }),
        )
        .await;
    }

    let base = format!("/subscriptions/price?user_id={user_id}");
    let cases = [
        (base.clone(), 600),
        (format!("{base}&service_name=Spotify"), 200),
        (format!("{base}&service_name=Netflix"), 400),
        (format!("{base}&from_date=03-2024"), 500),
        (format!("{base}&to_date=06-2024"), 100),
        (format!("{base}&service_name=&from_date=&to_date="), 600),
    ];
    for (uri, expected) in cases {
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!(expected), "{uri}");
    }

    let (status, _) = send(&app, Method::GET, &format!("{base}&service_name=Hulu"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "no matching rows");

    let (status, _) = send(&app, Method::GET, &format!("{base}&from_date=2024-03"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, &format!("{base}&from_date=%2003-2024")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "padded from_date");
}

#[tokio::test]
async fn test_price_sum_strips_markup_from_filter() {
    let app = memory_app();
    let user_id = Uuid::new_v4();
    create(&app, netflix(user_id)).await;
    let mut spotify = netflix(user_id);
    spotify["service_name"] = json!("Spotify");
    spotify["price"] = json!(200);
    create(&app, spotify).await;

    let base = format!("/subscriptions/price?user_id={user_id}");

    let tagged = format!("{base}&service_name=Netflix%3Cscript%3Ex%3C/script%3E");
    let (status, body) = get(&app, &tagged).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(100));

    // Markup-only input still filters, on the empty name, and matches nothing.
    let markup_only = format!("{base}&service_name=%3Cscript%3Ex%3C/script%3E");
    let (status, body) = get(&app, &markup_only).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, bad_request());
}

// =============================================================================
// Update / Delete
// =============================================================================

#[tokio::test]
async fn test_patch() {
    let app = memory_app();
    let id = create(&app, netflix(Uuid::new_v4())).await;
    let uri = format!("/subscriptions/{id}");

    let (status, body) = send(&app, Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "no parameters");
    assert_eq!(body, internal_error());

    let (status, _) = send(&app, Method::PATCH, &format!("{uri}?price=&end_date="), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "empty parameters");

    let (_, body) = get(&app, &uri).await;
    assert_eq!(body["price"], 100, "unchanged after empty update");

    let (status, body) = send(&app, Method::PATCH, &format!("{uri}?price=250"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::PATCH, &format!("{uri}?end_date=12-2024"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["price"], 250);
    assert_eq!(body["end_date"], "12-2024");

    let (status, _) = send(&app, Method::PATCH, &format!("{uri}?price=abc"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PATCH, &format!("{uri}?end_date=%2012-2024"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "padded end_date");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/subscriptions/{}?price=1", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unknown id");
}

#[tokio::test]
async fn test_delete_twice() {
    let app = memory_app();
    let id = create(&app, netflix(Uuid::new_v4())).await;
    let uri = format!("/subscriptions/{id}");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let app = memory_app();
    let user_id = Uuid::new_v4();
    create(&app, netflix(user_id)).await;

    let (status, _) = get(&app, &format!("/subscriptions/?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/health/", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/subscriptions")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

// =============================================================================
// Store Failures
// =============================================================================

struct FailingRepository;

fn unavailable() -> SubscriptionError {
    SubscriptionError::store("connection reset by peer")
}

#[async_trait]
impl SubscriptionRepository for FailingRepository {
    async fn get_by_id(&self, _id: Uuid) -> SubscriptionResult<Subscription> {
        Err(unavailable())
    }

    async fn get_list_by_user_id(&self, _user_id: Uuid) -> SubscriptionResult<Vec<Subscription>> {
        Err(unavailable())
    }

    async fn get_price_sum_by_user_id(
        &self,
        _user_id: Uuid,
        _filter: &SumFilter,
    ) -> SubscriptionResult<i64> {
        Err(unavailable())
    }

    async fn create(&self, _subscription: &Subscription) -> SubscriptionResult<()> {
        Err(unavailable())
    }

    async fn update_by_id(&self, _id: Uuid, _update: SubscriptionUpdate) -> SubscriptionResult<()> {
        Err(unavailable())
    }

    async fn delete_by_id(&self, _id: Uuid) -> SubscriptionResult<()> {
        Err(unavailable())
    }
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = app_with(Arc::new(FailingRepository));
    let id = Uuid::new_v4();

    let (status, body) = get(&app, &format!("/subscriptions/{id}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, internal_error());

    let (status, body) = send(&app, Method::POST, "/subscriptions", Some(netflix(id))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, internal_error());

    // Validation still runs first.
    let (status, _) = send(&app, Method::GET, "/subscriptions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
