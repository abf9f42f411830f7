//! HTTP client for the server tier.
//!
//! The gateway never interprets upstream answers: status code, content type
//! and body are handed back to the caller unchanged.

use std::time::Duration;

use axum::http::{header::CONTENT_TYPE, Method};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use shareit_core::{SHARER_USER_HEADER, UserId};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServerClient {
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward a bodiless call; `target` is the path plus query string.
    pub async fn forward(&self, method: Method, target: &str, sharer: Option<UserId>) -> reqwest::Result<Response> {
        self.relay(self.request(method, target, sharer)).await
    }

    pub async fn forward_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        target: &str,
        sharer: Option<UserId>,
        body: &B,
    ) -> reqwest::Result<Response> {
        self.relay(self.request(method, target, sharer).json(body)).await
    }

    fn request(&self, method: Method, target: &str, sharer: Option<UserId>) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, target);
        tracing::debug!(%method, %url, "forwarding to server");

        let request = self.http.request(method, url);
        match sharer {
            Some(user) => request.header(SHARER_USER_HEADER, user.to_string()),
            None => request,
        }
    }

    async fn relay(&self, request: reqwest::RequestBuilder) -> reqwest::Result<Response> {
        let upstream = request.send().await?;
        let status = upstream.status();
        let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
        let body = upstream.bytes().await?;

        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        headers.remove(CONTENT_TYPE);
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, content_type);
        }
        Ok(response)
    }
}
