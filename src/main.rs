use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cfb_review::cli::{Cli, Command};
use cfb_review::config::Config;
use cfb_review::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cfb_review=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    // Saved keys from .env (real env vars take precedence).
    Config::load_env_file();

    let pipeline = Pipeline::new(config, &cli.data_dir);

    match cli.command {
        Command::Fetch {
            game,
            year,
            week,
            force,
        } => pipeline.fetch(game, year, week, force).await,
        Command::Report { game, out } => pipeline.report(game, out),
        Command::Compare { game, out } => pipeline.compare(game, out),
        Command::Season { team, out } => pipeline.season(&team, out),
        Command::Check => pipeline.check().await,
    }
}
