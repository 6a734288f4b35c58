use dotenvy::dotenv;
use nobg_bot::bot::runner::run_bot;
use nobg_bot::config::Settings;
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Secret patterns masked in every log line
struct Redactor {
    rules: Vec<(Regex, &'static str)>,
}

impl Redactor {
    /// # Errors
    ///
    /// Returns an error if any pattern is invalid
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            rules: vec![
                // Bot token, bare or inside an api.telegram.org URL
                (
                    Regex::new(r"[0-9]{8,10}:[A-Za-z0-9_-]{30,}")?,
                    "[TELEGRAM_TOKEN]",
                ),
                (
                    Regex::new(r#"(?i)(x-api-key["']?\s*[:=]\s*["']?)[A-Za-z0-9_-]+"#)?,
                    "${1}[MASKED]",
                ),
                (
                    Regex::new(r"REMOVE_BG_API_KEY=[^\s&]+")?,
                    "REMOVE_BG_API_KEY=[MASKED]",
                ),
            ],
        })
    }

    fn redact(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |line, (pattern, replacement)| {
                pattern.replace_all(&line, *replacement).into_owned()
            })
    }
}

/// Stderr log sink that masks secrets before writing.
#[derive(Clone)]
struct RedactedStderr(Arc<Redactor>);

impl Write for RedactedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = self.0.redact(&String::from_utf8_lossy(buf));
        io::stderr().write_all(line.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Compile redaction patterns before any log line is written
    let redactor = Arc::new(Redactor::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(redactor);

    info!("Starting remove.bg Telegram bot...");

    let settings = init_settings();

    if let Err(e) = run_bot(settings).await {
        error!("Bot stopped with error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(redactor: Arc<Redactor>) {
    let sink = RedactedStderr(redactor);

    let debug_mode = std::env::var("DEBUG_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let filter = if debug_mode {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("nobg_bot=info,teloxide=info,hyper=warn,h2=error,reqwest=warn,tokio=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(move || sink.clone()))
        .init();
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}
