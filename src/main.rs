use anyhow::Result;
use clap::Parser;
use globe_sky::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    globe_sky::logging::init();
    let cli = Cli::parse();
    globe_sky::run(cli).await
}
