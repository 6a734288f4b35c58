//! Chat-side I/O needed by the relay pipeline.

use anyhow::Result;
use async_trait::async_trait;

/// Chat platform operations used while relaying one image.
///
/// Implemented by the Telegram transport; tests substitute mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Show a "processing" presence indicator in the chat.
    async fn signal_processing(&self, chat_id: i64) -> Result<()>;

    /// Download the full content of an attachment.
    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>>;

    /// Send a plain-text message.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Send PNG bytes as a document with a caption.
    async fn send_png(
        &self,
        chat_id: i64,
        file_name: &str,
        caption: &str,
        bytes: Vec<u8>,
    ) -> Result<()>;
}
