//! Sport complex client registry
//!
//! Architecture:
//! - SeaORM for database access (SQLite)
//! - Clap-parsed console commands standing in for the desk UI
//! - Tokio for async runtime

mod console;

use anyhow::Context;
use sport::{config::Config, state::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::console::Console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  let config = Config::from_env()?;

  // Logs go to stderr, stdout belongs to the console
  tracing_subscriber::registry()
    .with(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  info!("Starting sport registry v{}", env!("CARGO_PKG_VERSION"));

  let app = AppState::new(config)
    .await
    .context("Failed to open the client database")?;
  app.bootstrap().await.context("Failed to create the administrator")?;

  Console::new(app).run().await
}
