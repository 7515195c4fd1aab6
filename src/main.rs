//! Console chat client.
//!
//! Drives a [`ChatWidget`] against a live chatbot endpoint, reading user
//! input from stdin and rendering the conversation on stdout.

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::manual_let_else)]
#![allow(clippy::unused_async)]

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use chatbot_widget::config::AppConfig;
use chatbot_widget::terminal::Console;
use chatbot_widget::widget::ChatWidget;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) first so RUST_LOG from it applies
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED); stdout belongs to the chat
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = AppConfig::load()?;
    let transport = config.transport()?;

    info!(
        name: "chat.config.loaded",
        endpoint = %transport.endpoint(),
        timeout_secs = config.endpoint.timeout_secs,
        overlap = ?config.widget.overlap,
        "Chat configuration loaded"
    );

    let console = Arc::new(Console::stdout());
    let credentials = config.credential_provider();
    let widget = ChatWidget::initialize(
        console.affordances(),
        Arc::new(transport),
        credentials.as_ref(),
        config.widget_settings(),
    );
    widget.toggle_visibility();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/toggle" => {
                widget.toggle_visibility();
            }
            "/close" => widget.close_window(),
            _ if !console.send_enabled() => {
                console.notice("still waiting for the previous reply");
            }
            _ => {
                console.set_input(&line);
                in_flight.spawn(widget.send_from_input());
            }
        }

        while in_flight.try_join_next().is_some() {}
    }

    // Let outstanding replies land before exiting.
    while in_flight.join_next().await.is_some() {}

    info!(name: "chat.client.stopped", "Chat client stopped");
    Ok(())
}
