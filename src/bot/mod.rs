/// Command and image handlers
pub mod handlers;
/// Conversion of Telegram messages into pipeline input
pub mod media;
/// Telegram dispatcher entrypoint
pub mod runner;
/// `teloxide` implementation of the chat transport
pub mod transport;
