use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod platform;

#[derive(Parser)]
#[command(name = "shush-cli", version, about = "Turn the radio off for a while")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Render and poke the duration dial
    Dial {
        #[command(subcommand)]
        action: commands::dial::DialAction,
    },
    /// Run a picker session
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Radio control and the pending restore
    Radio {
        #[command(subcommand)]
        action: commands::radio::RadioAction,
    },
}

fn main() {
    // stdout carries JSON and SVG; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("SHUSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Dial { action } => commands::dial::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Radio { action } => commands::radio::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
