#![deny(missing_docs)]
//! Telegram bot that strips image backgrounds through remove.bg.
//!
//! Incoming photos and image documents are relayed to the remove.bg API and
//! the transparent PNG is sent back to the chat.

/// Telegram-specific bot/transport implementation.
pub mod bot;
/// Configuration management.
pub mod config;
/// Validate-fetch-call-reply pipeline.
pub mod relay;
/// remove.bg HTTP client.
pub mod removebg;
