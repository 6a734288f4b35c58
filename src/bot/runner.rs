use crate::bot::handlers::{self, Command};
use crate::config::Settings;
use crate::relay::RelayPipeline;
use crate::removebg::RemoveBgClient;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info, warn};

/// Run the Telegram transport runtime.
///
/// # Errors
///
/// Returns an error if the remove.bg HTTP client cannot be built.
pub async fn run_bot(settings: Arc<Settings>) -> anyhow::Result<()> {
    let pipeline = init_pipeline(&settings)?;

    let bot = Bot::new(settings.telegram_bot_token.clone());
    let handler = setup_handler();

    info!("Bot is running. Press Ctrl+C to stop.");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![pipeline])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn init_pipeline(settings: &Settings) -> anyhow::Result<Arc<RelayPipeline>> {
    let client = RemoveBgClient::from_settings(settings)?;
    info!(
        endpoint = client.endpoint(),
        timeout_secs = settings.remove_bg_timeout_secs,
        "remove.bg client initialized."
    );

    let api_key = settings.remove_bg_api_key().map(ToString::to_string);
    let pipeline = RelayPipeline::new(Arc::new(client), api_key);
    if !pipeline.has_api_key() {
        warn!("REMOVE_BG_API_KEY not set. The bot will not be able to process images.");
    }

    Ok(Arc::new(pipeline))
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        // Non-image messages reach the pipeline too and get the guidance reply
        .branch(
            dptree::filter(|msg: Message| {
                msg.photo().is_some() || msg.document().is_some() || msg.text().is_some()
            })
            .endpoint(handle_message),
        )
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::command(bot, msg, cmd).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    pipeline: Arc<RelayPipeline>,
) -> Result<(), teloxide::RequestError> {
    handlers::handle_image(bot, msg, pipeline).await;
    respond(())
}
