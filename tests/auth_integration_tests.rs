use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use store_rating_api::presentation::handlers::AppState;
use store_rating_api::presentation::routes;

macro_rules! setup_auth_test {
    () => {{
        let state = web::Data::new(AppState::in_memory(
            "test-secret-key-for-auth-tests".to_string(),
            3600,
        ));
        let auth_service = state.auth_service.clone();

        test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(move |cfg| routes::configure(cfg, auth_service)),
        )
        .await
    }};
}

fn signup(email: &str, role: Option<&str>) -> Value {
    let mut body = json!({
        "name": "Integration Test User Name",
        "email": email,
        "password": "Str0ng#Pass",
        "address": "42 Test Avenue",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    body
}

#[actix_web::test]
async fn test_full_registration_login_flow() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(signup("flow@example.com", Some("owner")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["email"], "flow@example.com");
    assert_eq!(body["data"]["user"]["role"], "owner");
    assert!(body["data"]["user"].get("password").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "flow@example.com", "password": "Str0ng#Pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["data"]["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(body["data"]["user"]["role"], "owner");

    // the token opens protected routes
    let req = test::TestRequest::get()
        .uri("/api/users/stores")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_register_defaults_to_user_role() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(signup("plain@example.com", None))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user"]["role"], "user");
}

#[actix_web::test]
async fn test_register_duplicate_email() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(signup("duplicate@example.com", None))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(signup("Duplicate@Example.com", None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email is already in use");
}

#[actix_web::test]
async fn test_register_validation_errors() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Too short",
            "email": "not-an-email",
            "password": "weak",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[actix_web::test]
async fn test_public_registration_cannot_claim_admin() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(signup("sneaky@example.com", Some("admin")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_register_malformed_json() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_login_wrong_password() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(signup("wrongpass@example.com", None))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "wrongpass@example.com", "password": "Wr0ng#Pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[actix_web::test]
async fn test_login_unknown_email() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ghost@example.com", "password": "Any#Pass1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_login_missing_fields() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_protected_route_token_checks() {
    let app = setup_auth_test!();

    let req = test::TestRequest::get().uri("/api/users/stores").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unauthorized access, please login");

    let req = test::TestRequest::get()
        .uri("/api/users/stores")
        .insert_header(("Authorization", "Bearer invalid.token.here"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid token");

    let req = test::TestRequest::get()
        .uri("/api/users/stores")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_update_password_via_api() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(signup("changer@example.com", None))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "changer@example.com", "password": "Str0ng#Pass" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/api/users/update-password")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "oldPassword": "Wr0ng#Pass", "newPassword": "N3w#Secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Old password is incorrect");

    let req = test::TestRequest::put()
        .uri("/api/users/update-password")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "oldPassword": "Str0ng#Pass", "newPassword": "N3w#Secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "changer@example.com", "password": "N3w#Secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "changer@example.com", "password": "Str0ng#Pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
