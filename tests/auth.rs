mod common;

use actix_web::{http::StatusCode, test, web, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use stockroom::auth::{generate_token, AuthSettings};
use stockroom::models::UserProfile;
use uuid::Uuid;

use common::{bearer, init_app, sign_up, PASSWORD};

#[actix_rt::test]
async fn test_register_login_and_me() {
    let app = init_app().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "warehouse_lead", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(resp).await;
    assert_eq!(registered["username"], "warehouse_lead");
    assert!(registered.get("password_hash").is_none());
    assert!(registered.get("password").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "warehouse_lead", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: stockroom::auth::AuthResponse = test::read_body_json(resp).await;
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.expires_in, 30 * 60);
    assert_eq!(registered["id"], json!(login.user_id));

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(bearer(&login.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: UserProfile = test::read_body_json(resp).await;
    assert_eq!(me.id, login.user_id);
    assert_eq!(me.username, "warehouse_lead");
}

#[actix_rt::test]
async fn test_duplicate_username_conflicts() {
    let app = init_app().await;
    sign_up(&app, "duplicate").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "duplicate", "password": "AnotherPass1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = init_app().await;
    sign_up(&app, "clerk").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "clerk", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "nobody", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = test::read_body_json(resp).await;

    assert_eq!(wrong_password, unknown_user);
}

#[actix_rt::test]
async fn test_register_rejects_invalid_input() {
    let app = init_app().await;

    for payload in [
        json!({ "username": "ab", "password": PASSWORD }),
        json!({ "username": "has spaces", "password": PASSWORD }),
        json!({ "username": "valid_name", "password": "short" }),
        json!({ "username": "valid_name" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_protected_routes_reject_bad_tokens() {
    let app = init_app().await;
    let login = sign_up(&app, "token_tester").await;

    let foreign = AuthSettings {
        jwt_secret: "some-other-secret".to_string(),
        ..common::auth_settings()
    };
    let expired = AuthSettings {
        jwt_expiration_minutes: -10,
        ..common::auth_settings()
    };
    let foreign_token =
        generate_token(&foreign, login.user_id, "token_tester").expect("foreign token");
    let expired_token =
        generate_token(&expired, login.user_id, "token_tester").expect("expired token");

    let payload = json!({ "name": "Tools", "description": null });
    let cases: Vec<Option<String>> = vec![
        None,
        Some("not-a-jwt".to_string()),
        Some(foreign_token),
        Some(expired_token),
    ];

    for token in cases {
        let mut req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(&payload);
        if let Some(token) = &token {
            req = req.append_header(bearer(token));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "token: {:?}", token);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    // A scheme other than Bearer is not accepted either.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Basic {}", login.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_token_for_unknown_user_is_rejected_by_me() {
    let app = init_app().await;
    let token = generate_token(&common::auth_settings(), Uuid::new_v4(), "ghost").expect("token");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_unknown_route_returns_json_404() {
    let app = init_app().await;

    for uri in ["/nowhere", "/api/nowhere"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri: {}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

#[actix_rt::test]
async fn test_create_product_unauthorized_over_http() {
    let state = web::Data::new(common::app_state());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(stockroom::configure)
            .default_service(web::to(stockroom::routes::not_found))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind random port");
    let port = server.addrs()[0].port();
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/products", port))
        .json(&json!({
            "name": "Unauthorized widget",
            "price": 1.5,
            "category_id": Uuid::new_v4()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("JSON error body");
    assert!(body["error"].is_string());

    let resp = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    handle.stop(true).await;
}
