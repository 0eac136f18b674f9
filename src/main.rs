use clap::Parser;
use pausekit::{init_logging, run, Cli, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;
    tracing::debug!(version = VERSION, built = BUILD_DATE, "pausekit");

    let report = run(&cli)?;

    if cli.json {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
