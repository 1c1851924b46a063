mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use portfolio_api::database::UserRepository;

#[tokio::test]
async fn registered_user_gets_a_working_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .post("/api/auth/verify-google-id-token")
        .json(&json!({"credentialResponse": common::ADMIN_ID_TOKEN}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::json(res).await?;
    let token = body["token"].as_str().expect("token for registered user").to_string();

    let res = server.get("/api/auth/whoami").bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me = common::json(res).await?;
    assert_eq!(me["email"], common::ADMIN_EMAIL);
    assert!(me["exp"].as_i64().is_some());

    let res = server
        .post("/api/blog-admin/create")
        .bearer_auth(&token)
        .json(&json!({"title": "A", "content": "B"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn unregistered_user_gets_no_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .post("/api/auth/verify-google-id-token")
        .json(&json!({"credentialResponse": common::STRANGER_ID_TOKEN}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::json(res).await?;
    assert_eq!(body["message"], "등록되지 않은 사용자입니다.");
    assert!(body.get("token").is_none(), "unexpected token: {}", body);

    assert!(server.store.find_by_email("stranger@example.com").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn invalid_identity_token_is_401() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .post("/api/auth/verify-google-id-token")
        .json(&json!({"credentialResponse": "forged"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::json(res).await?["kind"], "invalid_identity_token");
    Ok(())
}

#[tokio::test]
async fn missing_credential_is_400() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.post("/api/auth/verify-google-id-token").json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn whoami_requires_a_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/api/auth/whoami").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server.get("/api/auth/whoami").bearer_auth("garbage").send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
