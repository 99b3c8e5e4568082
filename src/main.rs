//! Agentry CLI entry point.

use clap::Parser;

use agentry::cli::{Cli, Commands};
use agentry::domain::models::LoggingConfig;

#[tokio::main]
async fn main() {
    agentry::infrastructure::logging::init(&LoggingConfig::default());

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => agentry::cli::commands::init::execute(args, cli.json).await,
        Commands::Agent(args) => agentry::cli::commands::agent::execute(args, cli.json).await,
        Commands::Tool(args) => agentry::cli::commands::tool::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        agentry::cli::handle_error(err, cli.json);
    }
}
