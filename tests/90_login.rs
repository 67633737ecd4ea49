mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn blank_credentials_are_refused_without_cookies() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/login"))
        .json(&json!({ "email": "", "password": "" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get("set-cookie").is_none());

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Email ou mot de passe incorrect");
    Ok(())
}

#[tokio::test]
async fn login_without_body_is_a_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new().post(server.url("/login")).send().await?;

    assert!(res.status().is_client_error(), "expected client error, got {}", res.status());
    Ok(())
}

#[tokio::test]
async fn logout_expires_the_session_cookies() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new().post(server.url("/logout")).send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    let cookies: Vec<&str> = res.headers().get_all("set-cookie").iter().filter_map(|v| v.to_str().ok()).collect();
    assert_eq!(cookies.len(), 4);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    Ok(())
}
