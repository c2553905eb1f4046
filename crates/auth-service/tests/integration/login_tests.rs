//! End-to-end tests for `POST /auth/telegram`

use auth_test_utils::{
    test_directory, TestAuthServer, TestLoginBuilder, TokenAssertions, TEST_TELEGRAM_ID_OPERATOR,
    TEST_TELEGRAM_ID_SPECIALIST, TEST_TELEGRAM_ID_UNKNOWN,
};
use auth_service::models::{TelegramId, TelegramLoginAssertion};
use reqwest::StatusCode;

async fn post_login(
    server: &TestAuthServer,
    assertion: &TelegramLoginAssertion,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/auth/telegram", server.url()))
        .json(assertion)
        .send()
        .await?)
}

async fn assert_error_code(
    response: reqwest::Response,
    status: StatusCode,
    code: &str,
) -> Result<(), anyhow::Error> {
    assert_eq!(response.status(), status);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], code);
    Ok(())
}

#[tokio::test]
async fn test_login_issues_token_for_operator() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .with_last_name("Petrov")
        .with_username("ivanp")
        .issued_seconds_ago(500)
        .build();

    let response = post_login(&server, &assertion).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);

    let token = body["access_token"].as_str().unwrap_or_default().to_string();
    token
        .assert_valid_jwt()
        .assert_for_subject("111")
        .assert_has_role(3)
        .assert_expires_in(3600);

    let claims = server.codec().decode(&token)?;
    assert_eq!(claims.user_id, Some(TEST_TELEGRAM_ID_OPERATOR));
    Ok(())
}

#[tokio::test]
async fn test_login_accepts_string_auth_date() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let now = chrono::Utc::now().timestamp().to_string();
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .auth_date_text(&now)
        .build();

    let response = post_login(&server, &assertion).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_login_accepts_web_client_payload() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .as_web_client()
        .build();

    // Exactly what the web client posts: every field a string
    let body = serde_json::json!({
        "id": "111",
        "first_name": assertion.first_name,
        "last_name": "",
        "username": "",
        "photo_url": "",
        "auth_date": assertion.auth_date.as_check_value(),
        "hash": assertion.hash,
    });

    let response = reqwest::Client::new()
        .post(format!("{}/auth/telegram", server.url()))
        .json(&body)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    body["access_token"]
        .as_str()
        .unwrap_or_default()
        .to_string()
        .assert_valid_jwt()
        .assert_for_subject("111");
    Ok(())
}

#[tokio::test]
async fn test_login_unparsable_id_is_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .id_text("operator")
        .build();

    let response = post_login(&server, &assertion).await?;

    assert_error_code(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await
}

#[tokio::test]
async fn test_login_unsigned_unparsable_id_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let mut assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR).build();
    assertion.id = TelegramId::Text("operator".to_string());

    let response = post_login(&server, &assertion).await?;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await
}

#[tokio::test]
async fn test_login_rejects_tampered_field() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let mut assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR).build();
    assertion.first_name = "Mallory".to_string();

    let response = post_login(&server, &assertion).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response
        .headers()
        .contains_key(reqwest::header::WWW_AUTHENTICATE));
    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await
}

#[tokio::test]
async fn test_login_rejects_other_bot_signature() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .signed_by("654321:SOME-OTHER-BOT")
        .build();

    let response = post_login(&server, &assertion).await?;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await
}

#[tokio::test]
async fn test_login_rejects_expired_assertion() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .issued_seconds_ago(90_000)
        .build();

    let response = post_login(&server, &assertion).await?;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await
}

#[tokio::test]
async fn test_login_unknown_user_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_UNKNOWN).build();

    let response = post_login(&server, &assertion).await?;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await
}

#[tokio::test]
async fn test_login_wrong_role_is_forbidden() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_SPECIALIST).build();

    let response = post_login(&server, &assertion).await?;

    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await
}

#[tokio::test]
async fn test_login_unparsable_auth_date_is_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .auth_date_text("yesterday")
        .build();

    let response = post_login(&server, &assertion).await?;

    assert_error_code(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await
}

#[tokio::test]
async fn test_login_missing_fields_is_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/auth/telegram", server.url()))
        .json(&serde_json::json!({ "id": 111, "first_name": "A" }))
        .send()
        .await?;

    assert_error_code(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await
}

#[tokio::test]
async fn test_login_ignores_unknown_fields() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR).build();
    let mut body = serde_json::to_value(&assertion)?;
    body["extra"] = serde_json::Value::from("ignored");

    let response = reqwest::Client::new()
        .post(format!("{}/auth/telegram", server.url()))
        .json(&body)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_login_directory_outage_is_internal_error() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    server.directory().set_failing(true);
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR).build();

    let response = post_login(&server, &assertion).await?;

    assert_error_code(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "DATABASE_ERROR",
    )
    .await
}
