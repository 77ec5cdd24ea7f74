use clap::Parser;
use price_dashboard::cli::{print_config, Cli, Commands};
use price_dashboard::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });
    config.apply_env()?;

    // Initialize telemetry
    let _telemetry = price_dashboard::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting price dashboard server");
            args.execute(&config).await?;
        }
        Commands::Fetch(args) => {
            tracing::debug!("Running one-shot fetch");
            args.execute(&config).await?;
        }
        Commands::Config => {
            print_config(&config);
        }
    }

    Ok(())
}
