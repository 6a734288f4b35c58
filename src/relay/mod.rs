//! Relay pipeline
//!
//! One inbound message goes through validate → fetch → remove.bg → reply and
//! produces exactly one outgoing message. Every failure is converted into a
//! text reply here; nothing propagates to the dispatcher.

pub mod plan;
pub mod transport;

pub use plan::{
    AttachmentKind, AttachmentRef, InboundAttachment, InboundDocument, InboundMessage, Reply,
};
pub use transport::ChatTransport;

use crate::removebg::{BackgroundRemover, RemovalError};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Reasons a relay run ends without a processed image
#[derive(Debug, Error)]
pub enum RelayError {
    /// No remove.bg API key configured
    #[error("REMOVE_BG_API_KEY is missing")]
    MissingApiKey,
    /// Message carries no photo or image document
    #[error("message has no image attachment")]
    NotAnImage,
    /// remove.bg returned a non-success status
    #[error("remove.bg failed with status {status}")]
    Service {
        /// HTTP status code
        status: u16,
        /// JSON error body, if any
        payload: Option<Value>,
    },
    /// Download, network or any other unexpected failure
    #[error("transport failure: {0}")]
    Transport(String),
}

impl RelayError {
    /// Text shown to the user. Only service failures expose a reason.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => {
                "Server configuration issue: REMOVE_BG_API_KEY is missing.".to_string()
            }
            Self::NotAnImage => "Please send an image (photo or image document).".to_string(),
            Self::Service { .. } => format!("Background removal failed: {self}"),
            Self::Transport(_) => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

impl From<RemovalError> for RelayError {
    fn from(err: RemovalError) -> Self {
        match err {
            RemovalError::MissingApiKey => Self::MissingApiKey,
            RemovalError::Service { status, payload } => Self::Service { status, payload },
            RemovalError::EmptyImage => Self::Transport("downloaded image is empty".to_string()),
            RemovalError::Transport(cause) => Self::Transport(cause),
        }
    }
}

/// Orchestrates one validate-fetch-call-reply run per message
pub struct RelayPipeline {
    remover: Arc<dyn BackgroundRemover>,
    api_key: Option<String>,
}

impl RelayPipeline {
    /// Create a pipeline using `remover`. A blank `api_key` counts as missing.
    #[must_use]
    pub fn new(remover: Arc<dyn BackgroundRemover>, api_key: Option<String>) -> Self {
        Self {
            remover,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Whether an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run the pipeline for `message` and deliver the reply through `transport`.
    ///
    /// Returns the reply that was produced, whether or not sending it succeeded.
    pub async fn handle(&self, transport: &dyn ChatTransport, message: &InboundMessage) -> Reply {
        let chat_id = message.chat_id;
        let outcome = self.process(transport, message).await;

        if let Err(e) = &outcome {
            log_failure(chat_id, e);
        }

        let reply = plan::reply_for(outcome);
        if let Err(e) = deliver(transport, chat_id, &reply).await {
            error!(chat_id, error = %e, "Failed to send reply");
        }
        reply
    }

    async fn process(
        &self,
        transport: &dyn ChatTransport,
        message: &InboundMessage,
    ) -> Result<Vec<u8>, RelayError> {
        let api_key = self.api_key.as_deref().ok_or(RelayError::MissingApiKey)?;
        let attachment = plan::validate(message)?;

        if let Err(e) = transport.signal_processing(message.chat_id).await {
            debug!(chat_id = message.chat_id, error = %e, "Failed to send chat action");
        }

        let bytes = transport
            .fetch_file(&attachment.file_id)
            .await
            .map_err(|e| RelayError::Transport(format!("attachment download failed: {e:#}")))?;

        let attachment = InboundAttachment {
            bytes,
            kind: attachment.kind,
            chat_id: message.chat_id,
        };
        info!(
            chat_id = attachment.chat_id,
            kind = ?attachment.kind,
            size = attachment.bytes.len(),
            "Sending image to remove.bg"
        );

        let processed = self
            .remover
            .remove_background(attachment.bytes, api_key)
            .await?;

        info!(
            chat_id = attachment.chat_id,
            size = processed.len(),
            "Background removed"
        );
        Ok(processed)
    }
}

fn log_failure(chat_id: i64, err: &RelayError) {
    match err {
        RelayError::MissingApiKey => {
            warn!(chat_id, "Image received but REMOVE_BG_API_KEY is not configured");
        }
        RelayError::NotAnImage => debug!(chat_id, "Message has no image attachment"),
        // Status and payload are already logged by the remove.bg client
        RelayError::Service { status, .. } => {
            warn!(chat_id, status, "Background removal rejected by remove.bg");
        }
        RelayError::Transport(cause) => error!(chat_id, error = %cause, "Unexpected error"),
    }
}

async fn deliver(transport: &dyn ChatTransport, chat_id: i64, reply: &Reply) -> anyhow::Result<()> {
    match reply {
        Reply::Text(text) => transport.send_text(chat_id, text).await,
        Reply::Png {
            bytes,
            file_name,
            caption,
        } => {
            transport
                .send_png(chat_id, file_name, caption, bytes.clone())
                .await
        }
    }
}
