use anyhow::Context;
use clap::{Parser, Subcommand};

use shelf_kernel::settings::Settings;

/// Personal book-tracking service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations, then serve the HTTP API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print the resolved settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Migrate => {
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(db = %settings.database.url, "running migrations");
            shelf_app::bootstrap::migrate(settings).await
        }
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "starting shelf");
            shelf_app::bootstrap::serve(settings).await
        }
    }
}
