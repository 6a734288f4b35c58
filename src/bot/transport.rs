use crate::relay::ChatTransport;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId, FileId, InputFile};
use tracing::debug;

/// Telegram-backed [`ChatTransport`].
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Wrap a bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn signal_processing(&self, chat_id: i64) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::UploadPhoto)
            .await
            .map_err(|e| anyhow!("Telegram chat action error: {e}"))?;
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let file = self.bot.get_file(FileId(file_id.to_owned())).await?;
        let mut buf = Vec::new();
        self.bot.download_file(&file.path, &mut buf).await?;
        debug!(size = buf.len(), "Downloaded attachment from Telegram");
        Ok(buf)
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| anyhow!("Telegram send error: {e}"))?;
        Ok(())
    }

    async fn send_png(
        &self,
        chat_id: i64,
        file_name: &str,
        caption: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        // Sent as a document so Telegram keeps the alpha channel
        let input_file = InputFile::memory(bytes).file_name(file_name.to_owned());
        self.bot
            .send_document(ChatId(chat_id), input_file)
            .caption(caption)
            .await
            .map_err(|e| anyhow!("Telegram send error: {e}"))?;
        Ok(())
    }
}
