//! remove.bg client
//!
//! Wraps the single `POST /v1.0/removebg` call: image bytes in, transparent PNG
//! bytes (or a classified failure) out. No retries, no local state.

use crate::config::{
    Settings, REMOVE_BG_API_KEY_HEADER, REMOVE_BG_SIZE, REMOVE_BG_UPLOAD_FILE_NAME,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Errors that can occur while removing a background
#[derive(Debug, Error)]
pub enum RemovalError {
    /// No API key was supplied
    #[error("remove.bg API key is missing")]
    MissingApiKey,
    /// Image payload was empty
    #[error("image is empty")]
    EmptyImage,
    /// remove.bg answered with a non-200 status
    #[error("remove.bg failed with status {status}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body, if it parsed as JSON
        payload: Option<Value>,
    },
    /// No response was received (connect error, timeout, broken body)
    #[error("Network error: {0}")]
    Transport(String),
}

/// Outcome of one background-removal attempt; `Ok` carries the PNG bytes.
pub type RemovalResult = Result<Vec<u8>, RemovalError>;

/// Interface for background-removal services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background of `image_bytes`, authenticating with `api_key`.
    async fn remove_background(&self, image_bytes: Vec<u8>, api_key: &str) -> RemovalResult;
}

/// HTTP client for the remove.bg API
#[derive(Clone)]
pub struct RemoveBgClient {
    http_client: HttpClient,
    endpoint: String,
}

impl RemoveBgClient {
    /// Create a client for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a client from the endpoint and timeout in `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_settings(settings: &Settings) -> reqwest::Result<Self> {
        Self::new(
            settings.remove_bg_api_url.clone(),
            settings.remove_bg_timeout(),
        )
    }

    /// Target endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BackgroundRemover for RemoveBgClient {
    #[instrument(skip_all, fields(size = image_bytes.len()))]
    async fn remove_background(&self, image_bytes: Vec<u8>, api_key: &str) -> RemovalResult {
        if api_key.is_empty() {
            return Err(RemovalError::MissingApiKey);
        }
        if image_bytes.is_empty() {
            return Err(RemovalError::EmptyImage);
        }

        let form = Form::new().text("size", REMOVE_BG_SIZE).part(
            "image_file",
            Part::bytes(image_bytes).file_name(REMOVE_BG_UPLOAD_FILE_NAME),
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(REMOVE_BG_API_KEY_HEADER, api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemovalError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::OK {
            let body = response
                .bytes()
                .await
                .map_err(|e| RemovalError::Transport(e.to_string()))?;
            debug!(result_size = body.len(), "remove.bg returned processed image");
            return Ok(body.to_vec());
        }

        let body = response.bytes().await.unwrap_or_default();
        let payload = serde_json::from_slice::<Value>(&body).ok();
        match &payload {
            Some(payload) => {
                error!(status = status.as_u16(), payload = %payload, "remove.bg error");
            }
            None => error!(status = status.as_u16(), "remove.bg non-JSON error"),
        }

        Err(RemovalError::Service {
            status: status.as_u16(),
            payload,
        })
    }
}
