mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    pipelens::output::print_banner();

    let cli = Cli::parse();
    info!("Starting PipeLens - CI/CD Pipeline Quality Analyzer");
    cli.execute()?;

    Ok(())
}
