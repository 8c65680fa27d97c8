use clap::Parser;
use colored::Colorize;
use tracing::Level;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = commands::run_command(cli).await {
        eprintln!("{} {err:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
