mod cli;
mod display;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    boib_logging::initialize(&cli.log_settings());
    cli::run(cli).await
}
