use crate::error::{ApiError, ClientResult};
use estate_common::api::RENEW_TOKEN_HEADER;
use estate_common::utils::redact;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use std::time::Duration;

/// One outgoing call, described independently of any session.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn page(self, page: u64, size: u64) -> Self {
        self.query("pageNum", page).query("pageSize", size)
    }

    pub fn json<B: serde::Serialize>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// What came back, before any envelope handling.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Vec<u8>,
    /// Set when the backend handed out a fresh token with this response.
    pub renewed_token: Option<String>,
}

/// Builds a configured executor for a single call.
///
/// It only ever reads the token it is given and reports a renewal back in the
/// `Reply`. Applying it is the caller's job.
pub struct Transport {
    client: reqwest::Client,
    address: String,
}

impl Transport {
    pub fn new(address: &str, token: Option<&str>, timeout: Duration) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(token)
                .map_err(|_| ApiError::Transport("token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            address: address.trim_end_matches('/').to_string(),
        })
    }

    pub async fn send(&self, request: Request) -> ClientResult<Reply> {
        let url = format!("{}{}", self.address, request.path);
        tracing::debug!("{} {}", request.method, request.path);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {e}", request.method, request.path);
            ApiError::Transport(e.to_string())
        })?;

        let status = res.status();
        let renewed_token = res
            .headers()
            .get(RENEW_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from);
        if let Some(token) = &renewed_token {
            tracing::info!("Backend renewed token {}", redact(token));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_vec();
        tracing::debug!("{} {} -> {status}", request.method, request.path);

        Ok(Reply {
            status,
            body,
            renewed_token,
        })
    }
}
