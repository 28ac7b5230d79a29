use clap::{Parser, Subcommand};
use configuration::cli::Overrides;

/// The main entry point for the sample database API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_settings(cli.overrides.config.as_deref())?;
    cli.overrides.apply(&mut settings);
    settings.validate()?;

    // Held until exit so buffered file logs are flushed.
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => web_server::run_server(settings).await,
        Commands::CheckDb => {
            let pool = database::connect(&settings.database)?;
            let connection_id = database::probe(&pool).await?;
            tracing::info!(connection_id, "Connected to the database.");
            pool.close().await;
            Ok(())
        }
        Commands::Migrate => {
            let pool = database::connect(&settings.database)?;
            database::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied.");
            pool.close().await;
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// REST API over the agents, company, customer and foods tables.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Run the HTTP server (the default).
    Serve,
    /// Open one pooled connection, report its id and exit.
    CheckDb,
    /// Apply the embedded schema migrations and exit.
    Migrate,
}
