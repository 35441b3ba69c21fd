use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{create_router, AppState};
use crate::config::Config;
use crate::db::memory_pool;

const NO_BACKEND: &str = "http://127.0.0.1:9";

fn app(backend: &str) -> Router {
    create_router(AppState::new(memory_pool(), &Config::for_tests(backend)))
}

fn json_request(method: Method, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn multipart(uri: &str, field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn session_cookie(headers: &HeaderMap) -> String {
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn sign_up(app: &Router, email: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/signup",
            json!({ "name": "Ana", "email": email, "password": "secret1" }),
            None,
        ),
    )
    .await;
    (status, body)
}

#[tokio::test]
async fn health_is_ok() {
    let response = app(NO_BACKEND).oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_login_session_logout() {
    let app = app(NO_BACKEND);

    let (status, body) = sign_up(&app, "ana@example.ro").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "ana@example.ro");
    assert!(body["user"].get("password_hash").is_none());

    let (status, headers, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "email": "ana@example.ro", "password": "secret1" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana");

    let raw_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(raw_cookie.starts_with("user-session="));
    assert!(raw_cookie.contains("HttpOnly"));
    assert!(raw_cookie.contains("SameSite=Lax"));
    assert!(raw_cookie.contains("Max-Age=604800"));
    let cookie = session_cookie(&headers);

    let (_, _, body) = send(&app, get("/api/auth/session", Some(&cookie))).await;
    assert_eq!(body["user"]["email"], "ana@example.ro");

    let (status, _, body) = send(&app, get("/api/profile", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana");

    let (status, headers, _) = send(
        &app,
        json_request(Method::POST, "/api/auth/logout", json!({}), Some(&cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cleared = session_cookie(&headers);
    assert_eq!(cleared, "user-session=");

    let (_, _, body) = send(&app, get("/api/auth/session", Some(&cleared))).await;
    assert_eq!(body, json!({ "user": null }));
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let app = app(NO_BACKEND);
    assert_eq!(sign_up(&app, "ana@example.ro").await.0, StatusCode::CREATED);

    let (status, body) = sign_up(&app, "ana@example.ro").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "An account with this email already exists");
}

#[tokio::test]
async fn invalid_signup_reports_the_field() {
    let app = app(NO_BACKEND);
    let (status, _, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/signup",
            json!({ "name": "Ana", "email": "ana@example.ro", "password": "123" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "password");
}

#[tokio::test]
async fn bad_credentials_do_not_reveal_which_part_was_wrong() {
    let app = app(NO_BACKEND);
    sign_up(&app, "ana@example.ro").await;

    let (wrong_status, _, wrong_body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "email": "ana@example.ro", "password": "nope-nope" }),
            None,
        ),
    )
    .await;
    let (unknown_status, _, unknown_body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "email": "ghost@example.ro", "password": "secret1" }),
            None,
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn session_without_valid_cookie_is_null() {
    let app = app(NO_BACKEND);

    let (status, _, body) = send(&app, get("/api/auth/session", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "user": null }));

    let forged = r#"user-session={"id":"1","name":"x","email":"x@y.ro"}"#;
    let (status, _, body) = send(&app, get("/api/auth/session", Some(forged))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "user": null }));
}

#[tokio::test]
async fn profile_requires_a_session() {
    let (status, _, body) = send(&app(NO_BACKEND), get("/api/profile", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

async fn failing_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn pets_serves_fallback_when_backend_fails() {
    let server = failing_backend().await;
    let (status, _, body) = send(&app(&server.uri()), get("/api/pets", None)).await;

    assert_eq!(status, StatusCode::OK);
    let pets = body.as_array().unwrap();
    assert_eq!(pets.len(), 5);
    assert!(pets[0].get("imageUrl").is_some());
    assert!(pets[0].get("countyRaw").is_some());
}

#[tokio::test]
async fn browse_filters_and_paginates() {
    let server = failing_backend().await;
    let app = app(&server.uri());

    let (status, _, body) = send(&app, get("/api/pets/browse?species=dog", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["species"], "dog");
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 30);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["pageNumbers"], json!([1]));

    let (_, _, body) = send(&app, get("/api/pets/browse?price=under-500&q=PORC", None)).await;
    assert_eq!(body["totalItems"], 1);

    let (_, _, body) = send(&app, get("/api/pets/browse?page=2", None)).await;
    assert!(body["items"].as_array().unwrap().is_empty());

    let (status, _, body) = send(&app, get("/api/pets/browse?size=huge", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "size");
}

#[tokio::test]
async fn ai_search_reports_missing_configuration_distinctly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/gemini"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = app(&server.uri());

    let (status, _, body) = send(&app, get("/api/pets/gemini?prompt=caine", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
    assert!(body.get("details").is_some());

    let (status, _, _) = send(&app, get("/api/pets/gemini", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ai_search_upstream_failure_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/gemini"))
        .respond_with(ResponseTemplate::new(500).set_body_string("traceback: KeyError"))
        .mount(&server)
        .await;

    let (status, _, body) =
        send(&app(&server.uri()), get("/api/pets/gemini?prompt=caine", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().contains("traceback"));
}

#[tokio::test]
async fn image_search_requires_a_file_field() {
    let (status, _, body) = send(
        &app(NO_BACKEND),
        multipart("/api/pets/gemini/image", "photo", "cat.jpg", b"jpeg"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn voice_to_text_forwards_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pets/voice-to-text"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "transcript": "caut o pisica" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = send(
        &app(&server.uri()),
        multipart("/api/pets/voice-to-text", "audio_file", "voice.webm", b"webm-bytes"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "transcript": "caut o pisica" }));
}

async fn scraped_backend(count: usize) -> MockServer {
    let records: Vec<Value> = (0..count)
        .map(|n| {
            json!({
                "title": format!("Catel {n}"),
                "link": format!("https://www.animalutul.ro/anunt/{n}"),
                "category": "Caini",
                "county": "Cluj",
                "price": { "price_without_any_discounts": 100.0 + n as f64 }
            })
        })
        .collect();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(records)))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn identical_browse_requests_see_the_same_listing() {
    let server = scraped_backend(90).await;
    let app = app(&server.uri());

    let (status, _, first) = send(&app, get("/api/pets/browse?gender=female&page=1", None)).await;
    assert_eq!(status, StatusCode::OK);
    for _ in 0..3 {
        let (_, _, again) = send(&app, get("/api/pets/browse?gender=female&page=1", None)).await;
        assert_eq!(again, first);
    }

    let total = first["totalItems"].as_u64().unwrap() as usize;
    assert!(total > 0 && total < 90, "{total}");

    let (_, _, second) = send(&app, get("/api/pets/browse?gender=female&page=2", None)).await;
    let ids = |body: &Value| -> Vec<String> {
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pet| pet["id"].as_str().unwrap().to_string())
            .collect()
    };
    let (page1, page2) = (ids(&first), ids(&second));
    assert_eq!(page1.len() + page2.len(), total.min(60));
    assert!(page1.iter().all(|id| !page2.contains(id)));
}

#[tokio::test]
async fn non_numeric_page_is_a_field_error() {
    let server = failing_backend().await;
    let (status, headers, body) =
        send(&app(&server.uri()), get("/api/pets/browse?page=two", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(body["field"], "page");
}
