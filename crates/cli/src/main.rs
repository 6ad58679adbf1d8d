use anyhow::Context;
use clap::{Parser, Subcommand};

use biblio_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "biblio", about = "Book catalog service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Apply pending module migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load biblio settings")?;
    biblio_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => biblio_app::serve(settings).await,
        Command::Migrate => {
            let db = biblio_app::connect_database(&settings).await?;
            let registry = biblio_app::build_registry();

            db.apply_migrations(&registry.collect_migrations())
                .await
                .context("failed to apply migrations")?;

            tracing::info!("migrations applied");
            Ok(())
        }
    }
}
