use anyhow::Result;
use clap::Parser;

use pricewatch::application::{Cli, CommandExecutor};
use pricewatch::shared::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;

    if let Err(e) = CommandExecutor::execute(cli.command).await {
        tracing::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
