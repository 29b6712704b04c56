//! Register and log in through the HTTP API.

use axum_test::TestServer;
use docqa_api::auth::models::LoginResponse;
use serde_json::json;

pub struct TestUser {
    pub username: String,
    pub password: String,
    pub token: String,
}

pub async fn register(client: &TestServer, username: &str, password: &str, role: &str) {
    let response = client
        .post("/register")
        .json(&json!({ "username": username, "password": password, "role": role }))
        .await;
    assert_eq!(
        response.status_code(),
        200,
        "register {} failed: {}",
        username,
        response.text()
    );
}

pub async fn login(client: &TestServer, username: &str, password: &str) -> String {
    let response = client
        .post("/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    assert_eq!(
        response.status_code(),
        200,
        "login {} failed: {}",
        username,
        response.text()
    );
    response.json::<LoginResponse>().token
}

/// Register `username` with `role` and log in.
pub async fn register_and_login(client: &TestServer, username: &str, role: &str) -> TestUser {
    let password = format!("{}-password", username);
    register(client, username, &password, role).await;
    let token = login(client, username, &password).await;
    TestUser {
        username: username.to_string(),
        password,
        token,
    }
}
