#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use stockroom::auth::{AuthResponse, AuthSettings};
use stockroom::repository::InMemoryStore;
use stockroom::{routes, AppState};
use uuid::Uuid;

pub const PASSWORD: &str = "Sup3rSecret!";

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "integration-test-secret".to_string(),
        jwt_algorithm: Algorithm::HS256,
        jwt_expiration_minutes: 30,
        bcrypt_cost: 4,
    }
}

pub fn app_state() -> AppState {
    AppState::new(InMemoryStore::new(), auth_settings())
}

/// The full application over a fresh in-memory store.
pub async fn init_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(stockroom::configure)
            .default_service(web::to(routes::not_found)),
    )
    .await
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Registers `username` and logs in, returning the login response.
pub async fn sign_up(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> AuthResponse {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": username, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    test::read_body_json(resp).await
}

pub async fn create_category(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    name: &str,
) -> Uuid {
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .append_header(bearer(token))
        .set_json(json!({ "name": name, "description": null }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("category id")
}

pub async fn create_product(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    category_id: Uuid,
    name: &str,
    quantity_on_hand: i32,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/products")
        .append_header(bearer(token))
        .set_json(json!({
            "name": name,
            "description": "A product for testing",
            "price": 9.99,
            "quantity_on_hand": quantity_on_hand,
            "category_id": category_id
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(resp).await
}
