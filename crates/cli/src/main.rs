use args::Cli;
use clap::Parser;
use commands::process_args;

pub mod args;
pub mod commands;
pub mod error;
pub mod logging;
pub mod settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = logging::init()?;

    let args = Cli::parse();
    process_args(&args).await
}
