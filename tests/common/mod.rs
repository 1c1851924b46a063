#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use portfolio_api::auth::{IdentityError, IdentityVerifier, VerifiedIdentity};
use portfolio_api::config::AppConfig;
use portfolio_api::database::MemoryStore;
use portfolio_api::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Google ID tokens the fake verifier accepts
pub const ADMIN_ID_TOKEN: &str = "google-id-token-admin";
pub const STRANGER_ID_TOKEN: &str = "google-id-token-stranger";

/// Accepts a fixed set of identity tokens, rejects everything else
pub struct StaticVerifier {
    identities: HashMap<String, VerifiedIdentity>,
}

impl StaticVerifier {
    fn new() -> Self {
        let mut identities = HashMap::new();
        identities.insert(
            ADMIN_ID_TOKEN.to_string(),
            VerifiedIdentity {
                email: ADMIN_EMAIL.to_string(),
                name: Some("Admin".to_string()),
            },
        );
        identities.insert(
            STRANGER_ID_TOKEN.to_string(),
            VerifiedIdentity {
                email: "stranger@example.com".to_string(),
                name: None,
            },
        );
        Self { identities }
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.identities
            .get(id_token)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidToken("unknown test token".to_string()))
    }
}

/// One server per test, listening on an ephemeral local port
pub struct TestServer {
    pub base_url: String,
    pub store: MemoryStore,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();

        let mut config = AppConfig::development();
        config.security.jwt_secret = "integration-test-secret".to_string();

        let store = MemoryStore::new();
        store.add_user(ADMIN_EMAIL, Some("Admin")).await;

        let state = AppState::memory(config, store.clone(), Arc::new(StaticVerifier::new()))?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;

        let router = app(state.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            store,
            state,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Session token for the registered admin
    pub fn admin_token(&self) -> String {
        self.state.sessions.issue(ADMIN_EMAIL).expect("issue admin token")
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Same as `post` but carrying the admin's bearer token
    pub fn admin_post(&self, path: &str) -> RequestBuilder {
        self.post(path).bearer_auth(self.admin_token())
    }

    pub fn admin_put(&self, path: &str) -> RequestBuilder {
        self.put(path).bearer_auth(self.admin_token())
    }

    pub fn admin_delete(&self, path: &str) -> RequestBuilder {
        self.delete(path).bearer_auth(self.admin_token())
    }
}

pub async fn json(res: Response) -> Result<Value> {
    res.json::<Value>().await.context("response body was not JSON")
}
