//! Typed client for the recommendation REST API.
//!
//! Every call is a plain request/response returning [`ClientResult`]; there are
//! no retries and no timeouts beyond what the HTTP stack imposes.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    Client as HttpClient, Request, RequestBuilder,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::models::{
    HistorySnapshot, RecommendRequest, RecommendResponse, RecommendationItem, StatsSnapshot,
    ViewRecord,
};

/// Shown when the server gives no error message of its own
pub const GENERIC_ERROR: &str = "Something went wrong";

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// Text suitable for the page's error region
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Transport(_) => GENERIC_ERROR.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The five remote calls the UI depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn recommend(&self, query: &str, top_k: i64) -> ClientResult<Vec<RecommendationItem>>;

    async fn stats(&self) -> ClientResult<StatsSnapshot>;

    async fn history(&self) -> ClientResult<HistorySnapshot>;

    async fn record_view(&self, view: &ViewRecord) -> ClientResult<()>;

    async fn clear_history(&self) -> ClientResult<()>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// [`ApiClient`] over HTTP
#[derive(Clone)]
pub struct HttpApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds the request, marking it as JSON unless `.json()` already did
    fn prepare(&self, request: RequestBuilder) -> ClientResult<Request> {
        let mut request = request.build()?;
        request
            .headers_mut()
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        Ok(request)
    }

    /// Sends a JSON request; a non-2xx status becomes [`ClientError::Api`]
    /// carrying the body's `error` field or the generic fallback
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let request = self.prepare(request)?;
        let response = self.http_client.execute(request).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| GENERIC_ERROR.to_string());
            return Err(ClientError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn recommend(&self, query: &str, top_k: i64) -> ClientResult<Vec<RecommendationItem>> {
        let body = RecommendRequest::new(query, top_k);
        let response: RecommendResponse = self
            .fetch_json(self.http_client.post(self.url("/api/recommend")).json(&body))
            .await?;
        Ok(response.results)
    }

    async fn stats(&self) -> ClientResult<StatsSnapshot> {
        self.fetch_json(self.http_client.get(self.url("/api/stats"))).await
    }

    async fn history(&self) -> ClientResult<HistorySnapshot> {
        self.fetch_json(self.http_client.get(self.url("/api/history"))).await
    }

    async fn record_view(&self, view: &ViewRecord) -> ClientResult<()> {
        let _: Value = self
            .fetch_json(self.http_client.post(self.url("/api/history/view")).json(view))
            .await?;
        Ok(())
    }

    async fn clear_history(&self) -> ClientResult<()> {
        let _: Value = self
            .fetch_json(self.http_client.post(self.url("/api/history/clear")))
            .await?;
        Ok(())
    }
}
