use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("Error: {err:?}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    mdsite::logging::init().context("init logging")?;

    let cli = mdsite::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    mdsite::build::run(cli.build).context("build")?;

    Ok(())
}
