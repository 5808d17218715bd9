use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chirp_core::credentials::PasswordHasher;
use chirp_core::CoreConfig;
use chirp_server::config::{AppState, ServerConfig};
use chirp_server::router;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

fn app() -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let mut config = ServerConfig::new(CoreConfig::new("jwt-secret", POLKA_KEY));
    config.db_path = dir.path().join("database.json");
    config.static_root = dir.path().join("public");
    std::fs::create_dir(&config.static_root).unwrap();

    let state = AppState::with_hasher(config, PasswordHasher::with_cost(4)).unwrap();
    (dir, router(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<String>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = authorization {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn bearer(token: &Value) -> Option<String> {
    Some(format!("Bearer {}", token.as_str().unwrap()))
}

async fn register_and_login(app: &Router, email: &str, password: &str) -> Value {
    let creds = json!({ "email": email, "password": password });
    let (status, _) = send(app, Method::POST, "/api/users", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, login) = send(app, Method::POST, "/api/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    login
}

#[tokio::test]
async fn test_account_and_session_flow() {
    let (_dir, app) = app();

    let creds = json!({ "email": "walt@breakingbad.com", "password": "123456" });
    let (status, created) = send(&app, Method::POST, "/api/users", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({ "id": 1, "email": "walt@breakingbad.com", "is_chirpy_red": false }));

    let (status, _) = send(&app, Method::POST, "/api/users", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unknown email and wrong password look the same
    let (bad_email, e1) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "123456" })),
    )
    .await;
    let (bad_password, e2) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "walt@breakingbad.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(bad_email, StatusCode::UNAUTHORIZED);
    assert_eq!(bad_password, StatusCode::UNAUTHORIZED);
    assert_eq!(e1, e2);

    let (status, login) = send(&app, Method::POST, "/api/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["id"], 1);
    assert_eq!(login["refresh_token"].as_str().unwrap().len(), 64);

    let (status, refreshed) =
        send(&app, Method::POST, "/api/refresh", bearer(&login["refresh_token"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["token"].is_string());

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/users",
        bearer(&refreshed["token"]),
        Some(json!({ "email": "heisenberg@breakingbad.com", "password": "654321" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "heisenberg@breakingbad.com");

    let (status, _) =
        send(&app, Method::POST, "/api/revoke", bearer(&login["refresh_token"]), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
        send(&app, Method::POST, "/api/refresh", bearer(&login["refresh_token"]), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::POST, "/api/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let (_dir, app) = app();
    let body = Some(json!({ "body": "hello" }));

    let (status, _) = send(&app, Method::POST, "/api/chirps", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/chirps",
        Some("Bearer not-a-jwt".to_string()),
        body,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_post_flow() {
    let (_dir, app) = app();
    let walt = register_and_login(&app, "walt@breakingbad.com", "123456").await;
    let saul = register_and_login(&app, "saul@bettercall.com", "123456").await;

    let (status, post) = send(
        &app,
        Method::POST,
        "/api/chirps",
        bearer(&walt["token"]),
        Some(json!({ "body": "I had something interesting for breakfast Kerfuffle" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        post,
        json!({ "id": 1, "body": "I had something interesting for breakfast ****", "author_id": 1 })
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/chirps",
        bearer(&saul["token"]),
        Some(json!({ "body": "x".repeat(141) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(
        &app,
        Method::POST,
        "/api/chirps",
        bearer(&saul["token"]),
        Some(json!({ "body": "second" })),
    )
    .await;

    let (status, listed) = send(&app, Method::GET, "/api/chirps?sort=desc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);

    let (_, by_saul) = send(&app, Method::GET, "/api/chirps?author_id=2", None, None).await;
    assert_eq!(by_saul.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/api/chirps?author_id=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/chirps/9", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Someone else's post
    let (status, _) =
        send(&app, Method::DELETE, "/api/chirps/1", bearer(&saul["token"]), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, still_there) = send(&app, Method::GET, "/api/chirps/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there, post);

    let (status, _) =
        send(&app, Method::DELETE, "/api/chirps/1", bearer(&walt["token"]), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/chirps/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Missing post deletes are a no-op
    let (status, _) =
        send(&app, Method::DELETE, "/api/chirps/77", bearer(&walt["token"]), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_webhook_upgrade() {
    let (_dir, app) = app();
    let login = register_and_login(&app, "walt@breakingbad.com", "123456").await;
    assert_eq!(login["is_chirpy_red"], false);

    let upgrade = json!({ "event": "user.upgraded", "data": { "user_id": 1 } });
    let key = Some(format!("ApiKey {}", POLKA_KEY));

    let (status, _) = send(&app, Method::POST, "/api/polka/webhooks", None, Some(upgrade.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/polka/webhooks",
        Some("ApiKey wrong".to_string()),
        Some(upgrade.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/polka/webhooks",
        key.clone(),
        Some(json!({ "event": "user.payment_failed", "data": { "user_id": 1 } })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/polka/webhooks",
        key.clone(),
        Some(json!({ "event": "user.upgraded", "data": { "user_id": 99 } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/api/polka/webhooks", key, Some(upgrade)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, login) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "walt@breakingbad.com", "password": "123456" })),
    )
    .await;
    assert_eq!(login["is_chirpy_red"], true);
}

#[tokio::test]
async fn test_static_files_are_counted() {
    let (dir, app) = app();
    std::fs::write(dir.path().join("public").join("index.html"), "<h1>Welcome to Chirpy</h1>").unwrap();

    let (status, body) = send(&app, Method::GET, "/api/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));

    for _ in 0..2 {
        let (status, _) = send(&app, Method::GET, "/app/index.html", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, metrics) = send(&app, Method::GET, "/admin/metrics", None, None).await;
    assert!(metrics.as_str().unwrap().contains("visited 2 times"));

    let (status, _) = send(&app, Method::POST, "/api/reset", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, metrics) = send(&app, Method::GET, "/admin/metrics", None, None).await;
    assert!(metrics.as_str().unwrap().contains("visited 0 times"));
}

#[tokio::test]
async fn test_document_is_not_served_as_a_static_file() {
    let (dir, app) = app();
    std::fs::write(dir.path().join("public").join("index.html"), "<h1>Chirpy</h1>").unwrap();
    register_and_login(&app, "walt@breakingbad.com", "123456").await;

    for uri in ["/app/database.json", "/app/../database.json", "/app/%2e%2e/database.json"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_ne!(status, StatusCode::OK, "{} was served", uri);
        assert!(body.get("accounts").is_none());
        assert!(!body.to_string().contains("password_hash"));
    }
}

#[tokio::test]
async fn test_bad_request_bodies_use_error_shape() {
    let (_dir, app) = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/polka/webhooks",
        Some(format!("ApiKey {}", POLKA_KEY)),
        Some(json!({ "event": "user.upgraded" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/chirps/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
