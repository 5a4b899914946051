use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use replabel::Config;
use tracing::debug;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 2)
        .init();

    debug!("replabel started with verbosity level: {}", cli.verbose);

    let config_path = Config::default_path()?;

    match cli.cmd {
        Commands::Label(args) => {
            let cfg = Config::load(&config_path)?;
            commands::label::handle(args, &cfg).await?
        }
        Commands::Collect(args) => {
            let cfg = Config::load(&config_path)?;
            commands::collect::handle(args, &cfg).await?
        }
        Commands::Config(cmd) => commands::config::handle(cmd, &config_path).await?,
    }

    Ok(())
}
