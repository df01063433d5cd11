use clap::Parser;
use gamblebot::cli::{describe_config, Cli, Commands, ReportMode};
use gamblebot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if std::path::Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    // Initialize telemetry
    gamblebot::telemetry::init_telemetry(&config.telemetry, cli.log_level.as_deref())?;

    match cli.command {
        Commands::Report(args) => {
            tracing::info!(season = args.season, week = args.week, "Building edge report");
            args.execute(&config, ReportMode::Edge).await?;
        }
        Commands::Likely(args) => {
            tracing::info!(season = args.season, week = args.week, "Building likelihood report");
            args.execute(&config, ReportMode::Likely).await?;
        }
        Commands::Evaluate(args) => {
            tracing::info!(season = args.season, week = args.week, "Evaluating logged predictions");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("{}", describe_config(&config));
        }
    }

    Ok(())
}
