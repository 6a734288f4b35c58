use crate::bot::media::extract_inbound;
use crate::bot::transport::TelegramTransport;
use crate::relay::RelayPipeline;
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};
use tracing::info;

/// Welcome text for `/start`.
pub const START_TEXT: &str = "Hello! Send me any image and I will remove its background and send you back a transparent PNG.\n\
     Tip: High-quality photos give better results.";

/// Usage text for `/help`.
pub const HELP_TEXT: &str = "Just send me an image. I will remove the background and send you a PNG.\n\
     If something goes wrong, please try again later.";

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// Explain how to use the bot
    #[command(description = "How to use the bot.")]
    Help,
}

impl Command {
    /// Static reply for the command.
    #[must_use]
    pub const fn reply_text(&self) -> &'static str {
        match self {
            Self::Start => START_TEXT,
            Self::Help => HELP_TEXT,
        }
    }
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Command handler
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn command(bot: Bot, msg: Message, cmd: Command) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} sent {cmd:?} command.");
    bot.send_message(msg.chat.id, cmd.reply_text()).await?;
    Ok(())
}

/// Image handler: runs the relay pipeline for one message.
///
/// The pipeline replies on its own and never fails; this only wires the
/// Telegram transport to it.
pub async fn handle_image(bot: Bot, msg: Message, pipeline: Arc<RelayPipeline>) {
    let inbound = extract_inbound(&msg);
    info!(
        user_id = get_user_id_safe(&msg),
        chat_id = inbound.chat_id,
        "Handling message in relay pipeline"
    );
    let transport = TelegramTransport::new(bot);
    pipeline.handle(&transport, &inbound).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_parse() {
        assert_eq!(Command::parse("/start", "nobg_bot").ok(), Some(Command::Start));
        assert_eq!(Command::parse("/help", "nobg_bot").ok(), Some(Command::Help));
        assert!(Command::parse("/clear", "nobg_bot").is_err());
    }

    #[test]
    fn test_command_texts() {
        assert!(Command::Start.reply_text().starts_with("Hello! Send me any image"));
        assert!(Command::Help.reply_text().contains("try again later"));
    }
}
