//! HTTP client for the assistant backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::types::{
    HistoryResponse, LoginRequest, LoginResponse, QueryRequest, QueryResponse, RegisterRequest,
    RegisterResponse,
};

pub const QUERY_ENDPOINT: &str = "/api/query";
pub const HISTORY_ENDPOINT: &str = "/api/history";
pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";

/// What the session needs from the backend.
#[async_trait]
pub trait QueryApi: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError>;

    /// Recent queries stored server-side, newest first.
    async fn history(&self) -> Result<Vec<String>, ClientError>;
}

pub struct HttpQueryClient {
    base_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpQueryClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ClientError::Build)?;

        tracing::info!(
            base_url = %config.base_url,
            connect_timeout_secs = config.connect_timeout_secs,
            request_timeout_secs = config.request_timeout_secs,
            "Creating backend client"
        );

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Sign in and keep the returned bearer token for later calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post_json(LOGIN_ENDPOINT, &request).await?;
        self.set_token(Some(response.token.clone()));
        tracing::info!(user = %response.user.name, role = %response.user.role, "Signed in");
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        self.post_json(REGISTER_ENDPOINT, request).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let builder = self.authorize(self.client.post(self.url(endpoint)).json(body));
        self.send(endpoint, builder).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let builder = self.authorize(self.client.get(self.url(endpoint)));
        self.send(endpoint, builder).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let transport = |source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        decode_body(endpoint, status, &body)
    }
}

#[async_trait]
impl QueryApi for HttpQueryClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        self.post_json(QUERY_ENDPOINT, request).await
    }

    async fn history(&self) -> Result<Vec<String>, ClientError> {
        let response: HistoryResponse = self.get_json(HISTORY_ENDPOINT).await?;
        Ok(response.history)
    }
}

/// Decode a response body, rejecting HTML error pages and non-2xx statuses.
pub fn decode_body<T: DeserializeOwned>(
    endpoint: &str,
    status: u16,
    body: &str,
) -> Result<T, ClientError> {
    // Proxies sometimes answer with an HTML page instead of JSON
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Err(ClientError::Html {
            endpoint: endpoint.to_string(),
            status,
            preview: trimmed.chars().take(200).collect(),
        });
    }

    if !(200..300).contains(&status) {
        return Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status,
            message: error_message(body),
        });
    }

    serde_json::from_str(body).map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

// Backend errors carry `message` (or `msg` from the auth layer).
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("msg"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
