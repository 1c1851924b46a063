mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/health").send().await?;
    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());

    let body = common::json(res).await?;
    assert_eq!(body["status"], "ok", "unexpected body: {}", body);
    assert_eq!(body["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.get("/").send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::json(res).await?;
    assert!(body["endpoints"]["blog"].is_string(), "missing blog endpoints: {}", body);
    assert!(body["version"].is_string());
    Ok(())
}
