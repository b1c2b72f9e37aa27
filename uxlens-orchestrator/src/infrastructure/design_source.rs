//! Figma REST API client
//!
//! Documents come from `GET /files/{key}` (whole file) or `GET /files/{key}/nodes?ids=`
//! (one node). Renders come from `GET /images/{key}?ids=&scale=&format=`, which answers
//! with a map of node id to a temporary image URL (or `null` when rendering failed).

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use uxlens_core::config::DesignSourceConfig;

use crate::domain::services::{DesignSource, DesignSourceError};

const TOKEN_HEADER: &str = "X-Figma-Token";

pub struct FigmaDesignSource {
    client: Client,
    base_url: String,
    access_token: Option<String>,
    image_scale: f64,
    image_format: String,
}

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to build HTTP client with custom timeout, using default client");
            Client::new()
        })
}

impl FigmaDesignSource {
    pub fn new(config: &DesignSourceConfig) -> Self {
        Self {
            client: build_client(config.timeout_seconds),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            image_scale: config.image_scale,
            image_format: config.image_format.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        reference: &str,
    ) -> Result<Value, DesignSourceError> {
        let mut request = self.client.get(url).query(query);
        if let Some(token) = &self.access_token {
            request = request.header(TOKEN_HEADER, token);
        }

        debug!(url, "Design API request");
        let response = request
            .send()
            .await
            .map_err(|e| DesignSourceError::Network(e.to_string()))?;

        let response = check_status(response, reference).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| DesignSourceError::InvalidResponse(e.to_string()))
    }
}

async fn check_status(response: Response, reference: &str) -> Result<Response, DesignSourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = error_message(&text);
    Err(match status {
        StatusCode::NOT_FOUND => DesignSourceError::NotFound(reference.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DesignSourceError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => DesignSourceError::RateLimited,
        _ => {
            error!(status = %status, "Design API error: {}", message);
            DesignSourceError::Http {
                status: status.as_u16(),
                message,
            }
        }
    })
}

/// Figma errors look like `{"status": 403, "err": "Invalid token"}`
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("err")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl DesignSource for FigmaDesignSource {
    async fn fetch_document(
        &self,
        file_key: &str,
        node_id: Option<&str>,
    ) -> Result<Value, DesignSourceError> {
        match node_id {
            None => {
                let url = format!("{}/files/{}", self.base_url, file_key);
                let mut body = self.get_json(&url, &[], file_key).await?;
                body.get_mut("document").map(Value::take).ok_or_else(|| {
                    DesignSourceError::InvalidResponse("file response has no document".into())
                })
            }
            Some(node_id) => {
                let url = format!("{}/files/{}/nodes", self.base_url, file_key);
                let reference = format!("{}/{}", file_key, node_id);
                let mut body = self
                    .get_json(&url, &[("ids", node_id.to_string())], &reference)
                    .await?;
                // An unknown id comes back as `"nodes": {"<id>": null}`
                match body
                    .get_mut("nodes")
                    .and_then(|nodes| nodes.get_mut(node_id))
                    .and_then(|node| node.get_mut("document"))
                {
                    Some(document) if document.is_object() => Ok(document.take()),
                    _ => Err(DesignSourceError::NotFound(reference)),
                }
            }
        }
    }

    async fn render_frame(
        &self,
        file_key: &str,
        node_id: &str,
    ) -> Result<String, DesignSourceError> {
        let url = format!("{}/images/{}", self.base_url, file_key);
        let query = [
            ("ids", node_id.to_string()),
            ("scale", self.image_scale.to_string()),
            ("format", self.image_format.clone()),
        ];
        let body = self
            .get_json(&url, &query, &format!("{}/{}", file_key, node_id))
            .await?;

        if let Some(err) = body.get("err").and_then(Value::as_str) {
            return Err(DesignSourceError::InvalidResponse(err.to_string()));
        }

        body.get("images")
            .and_then(|images| images.get(node_id))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DesignSourceError::NotRendered(node_id.to_string()))
    }
}
