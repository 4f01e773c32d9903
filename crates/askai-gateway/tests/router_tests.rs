// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end router tests over the test harness.

use askai_config::model::ServerConfig;
use askai_gateway::{AppState, build_router};
use askai_test_utils::{OTHER_TOKEN, OWNER_EMAIL, OWNER_TOKEN, Script, TestHarness};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const ORIGIN: &str = "https://askaiwithpy.onrender.com";

fn router(harness: &TestHarness) -> Router {
    let state = AppState {
        pipeline: harness.pipeline.clone(),
        login: harness.login.clone(),
    };
    build_router(state, &ServerConfig::default()).expect("router builds")
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, TestHarness::bearer(token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, TestHarness::bearer(token));
    }
    builder.body(Body::empty()).expect("request builds")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request succeeds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn chat_body(email: &str) -> Value {
    json!({
        "email": email,
        "model": "gpt-5.2",
        "question": "2+2?",
        "openaiapi_key": "sk-caller"
    })
}

#[tokio::test]
async fn health_probe_reports_endpoint() {
    let harness = TestHarness::new().await.unwrap();
    let (status, body) = send(&router(&harness), get("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoint"], "/chats/");
    assert!(body["status"].is_string());
}

#[tokio::test]
async fn chat_round_trip_uses_wire_field_names() {
    let harness = TestHarness::new().await.unwrap();
    let app = router(&harness);

    let (status, body) = send(&app, post("/chats/", Some(OWNER_TOKEN), chat_body(OWNER_EMAIL))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["email"], OWNER_EMAIL);
    assert_eq!(body["model"], "gpt-5.2");
    assert_eq!(body["question"], "2+2?");
    assert_eq!(body["answer"], "4");
    assert!(body["date"].is_string());
    assert!(body["id"].is_i64());

    let (status, history) = send(&app, get("/chats/", Some(OWNER_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["answer"], "4");
}

#[tokio::test]
async fn missing_bearer_is_401_everywhere() {
    let harness = TestHarness::new().await.unwrap();
    let app = router(&harness);

    let (status, body) = send(&app, post("/chats/", None, chat_body(OWNER_EMAIL))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Login required");

    for uri in ["/chats/", "/images/", "/videos/"] {
        let (status, _) = send(&app, get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    assert_eq!(harness.connector.calls().generations(), 0);
}

#[tokio::test]
async fn email_mismatch_is_403() {
    let harness = TestHarness::new().await.unwrap();
    let (status, body) = send(
        &router(&harness),
        post("/chats/", Some(OTHER_TOKEN), chat_body(OWNER_EMAIL)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Emails do not match");
    assert_eq!(harness.record_count(OWNER_EMAIL).await.unwrap(), 0);
}

#[tokio::test]
async fn provider_failure_is_generic_500() {
    let harness = TestHarness::new().await.unwrap();
    harness
        .connector
        .set_script(Script::Fail("Incorrect API key provided: sk-caller".into()));

    let (status, body) = send(
        &router(&harness),
        post(
            "/images/",
            Some(OWNER_TOKEN),
            json!({
                "email": OWNER_EMAIL,
                "model": "gpt-image-1",
                "description": "a fox",
                "openaiapi_key": "sk-caller"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(!detail.contains("sk-caller"));
    assert_eq!(harness.artifacts.puts(), 0);
}

#[tokio::test]
async fn upload_failure_is_500() {
    let harness = TestHarness::new().await.unwrap();
    harness.artifacts.set_failing(true);

    let (status, _) = send(
        &router(&harness),
        post(
            "/videos/",
            Some(OWNER_TOKEN),
            json!({
                "email": OWNER_EMAIL,
                "model": "sora-2",
                "duration": "4",
                "content": "waves",
                "openaiapi_key": "sk-caller"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(harness.record_count(OWNER_EMAIL).await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_body_is_422() {
    let harness = TestHarness::new().await.unwrap();
    let app = router(&harness);

    let (status, body) = send(
        &app,
        post("/chats/", Some(OWNER_TOKEN), json!({"email": OWNER_EMAIL})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = send(
        &app,
        post(
            "/videos/",
            Some(OWNER_TOKEN),
            json!({
                "email": OWNER_EMAIL,
                "model": "sora-2",
                "duration": 0,
                "content": "waves",
                "openaiapi_key": "sk-caller"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(harness.connector.calls().generations(), 0);
}

#[tokio::test]
async fn history_query_filters_by_date_and_ignores_extra_params() {
    let harness = TestHarness::new().await.unwrap();
    let app = router(&harness);
    send(&app, post("/chats/", Some(OWNER_TOKEN), chat_body(OWNER_EMAIL))).await;

    let (status, body) = send(
        &app,
        get(
            "/chats/?start_date=2000-01-01&end_date=2000-01-02&openaiapi_key=sk-x",
            Some(OWNER_TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, get("/chats/?start_date=2000-01-01", Some(OWNER_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, get("/chats/?start_date=yesterday", Some(OWNER_TOKEN))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_with_failed_bot_check_is_400() {
    let harness = TestHarness::builder()
        .with_bot_verdict(false)
        .build()
        .await
        .unwrap();

    let (status, body) = send(
        &router(&harness),
        post(
            "/verify-login",
            None,
            json!({"google_token": OWNER_TOKEN, "recaptcha_token": "captcha"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "reCAPTCHA verification failed");
    assert_eq!(harness.verifier.calls(), 0);
}

#[tokio::test]
async fn login_success_and_bad_token() {
    let harness = TestHarness::new().await.unwrap();
    let app = router(&harness);

    let (status, body) = send(
        &app,
        post(
            "/verify-login",
            None,
            json!({"google_token": OWNER_TOKEN, "recaptcha_token": "captcha"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], OWNER_EMAIL);

    let (status, _) = send(
        &app,
        post(
            "/verify-login",
            None,
            json!({"google_token": "forged", "recaptcha_token": "captcha"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cors_allows_only_the_configured_origin() {
    let harness = TestHarness::new().await.unwrap();
    let app = router(&harness);

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chats/")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "authorization,content-type"
    );

    let foreign = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(foreign).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );

    let foreign_preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chats/")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(foreign_preflight).await.unwrap();
    let allowed = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
    assert!(allowed.is_none(), "foreign origin allowed: {allowed:?}");
}
