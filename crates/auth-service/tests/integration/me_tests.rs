//! End-to-end tests for bearer authentication on `GET /auth/me`

use auth_test_utils::{
    test_directory, test_employee, TestAuthServer, TestClaimsBuilder, TestLoginBuilder,
    ROLE_OPERATOR, ROLE_SPECIALIST, TEST_HS256_SECRET, TEST_KEY_SEED, TEST_TELEGRAM_ID_OPERATOR,
    TEST_TELEGRAM_ID_SPECIALIST,
};
use reqwest::StatusCode;

async fn get_me(server: &TestAuthServer, authorization: Option<&str>) -> reqwest::Response {
    let mut request = reqwest::Client::new().get(format!("{}/auth/me", server.url()));
    if let Some(value) = authorization {
        request = request.header(reqwest::header::AUTHORIZATION, value);
    }
    request.send().await.unwrap()
}

fn assert_unauthorized(response: &reqwest::Response) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response
        .headers()
        .get(reqwest::header::WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(challenge.starts_with("Bearer"), "got {challenge:?}");
}

#[tokio::test]
async fn test_me_after_login() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR).build();

    let login: serde_json::Value = reqwest::Client::new()
        .post(format!("{}/auth/telegram", server.url()))
        .json(&assertion)
        .send()
        .await?
        .json()
        .await?;
    let token = login["access_token"].as_str().unwrap_or_default();

    let response = get_me(&server, Some(&format!("Bearer {token}"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["user_id"], TEST_TELEGRAM_ID_OPERATOR);
    assert_eq!(body["role"], ROLE_OPERATOR);
    assert_eq!(body["division"], "Test Division");
    Ok(())
}

#[tokio::test]
async fn test_me_allows_any_role() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let token = TestClaimsBuilder::new(TEST_TELEGRAM_ID_SPECIALIST)
        .with_role(ROLE_SPECIALIST)
        .sign_with_seed(TEST_KEY_SEED)?;

    let response = get_me(&server, Some(&format!("bearer {token}"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_me_reflects_current_directory_record() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let token = TestClaimsBuilder::new(TEST_TELEGRAM_ID_SPECIALIST)
        .with_role(ROLE_SPECIALIST)
        .sign_with_seed(TEST_KEY_SEED)?;
    server
        .directory()
        .insert(test_employee(TEST_TELEGRAM_ID_SPECIALIST, ROLE_OPERATOR));

    let response = get_me(&server, Some(&format!("Bearer {token}"))).await;

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["role"], ROLE_OPERATOR);
    Ok(())
}

#[tokio::test]
async fn test_me_missing_header() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;

    let response = get_me(&server, None).await;

    assert_unauthorized(&response);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn test_me_rejects_non_bearer_scheme() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;

    let response = get_me(&server, Some("Basic dXNlcjpwYXNz")).await;

    assert_unauthorized(&response);
    Ok(())
}

#[tokio::test]
async fn test_me_deleted_user_is_unauthorized_not_not_found() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let token = server
        .codec()
        .issue(&test_employee(TEST_TELEGRAM_ID_OPERATOR, ROLE_OPERATOR))?;
    server.directory().remove(TEST_TELEGRAM_ID_OPERATOR);

    let response = get_me(&server, Some(&format!("Bearer {token}"))).await;

    assert_unauthorized(&response);
    Ok(())
}

#[tokio::test]
async fn test_me_rejects_bad_tokens() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;

    let foreign_key = TestClaimsBuilder::new(TEST_TELEGRAM_ID_OPERATOR).sign_with_seed(42)?;
    let foreign_alg = TestClaimsBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .sign_hs256(TEST_HS256_SECRET)?;
    let expired = TestClaimsBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .expired()
        .sign_with_seed(TEST_KEY_SEED)?;
    let future = TestClaimsBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .issued_in_future(3600)
        .sign_with_seed(TEST_KEY_SEED)?;
    let no_user_id = TestClaimsBuilder::new(TEST_TELEGRAM_ID_OPERATOR)
        .without_user_id()
        .sign_with_seed(TEST_KEY_SEED)?;

    for token in [
        "garbage".to_string(),
        foreign_key,
        foreign_alg,
        expired,
        future,
        no_user_id,
    ] {
        let response = get_me(&server, Some(&format!("Bearer {token}"))).await;
        assert_unauthorized(&response);
    }
    Ok(())
}

#[tokio::test]
async fn test_me_directory_outage_is_internal_error() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(test_directory()).await?;
    let token = TestClaimsBuilder::new(TEST_TELEGRAM_ID_OPERATOR).sign_with_seed(TEST_KEY_SEED)?;
    server.directory().set_failing(true);

    let response = get_me(&server, Some(&format!("Bearer {token}"))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}
