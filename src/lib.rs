//! # PauseKit
//!
//! A pause-at-height post-processor for sliced 3D printer G-code. It finds
//! the first layer printed at or above a chosen height and, right before
//! that layer's first move, parks the head for a filament change and then
//! resumes the print where it stopped.
//!
//! ## Architecture
//!
//! PauseKit is organized as a workspace with multiple crates:
//!
//! 1. **pausekit-core** - Core types, pause configuration, errors
//! 2. **pausekit-postprocess** - Line scanning, trigger state machine, pause emitter, file I/O
//! 3. **pausekit-settings** - Configuration file handling
//! 4. **pausekit-devicedb** - Printer profiles (build height lookup)
//! 5. **pausekit** - Main binary that integrates all crates

pub mod cli;

use std::io::{self, BufRead, BufWriter, Write};

use anyhow::Context;
use pausekit_devicedb::{DeviceManager, DeviceProfileProvider};
use pausekit_postprocess::{GcodeFileReader, GcodeFileWriter, PausePipeline};
use pausekit_settings::Config;

pub use cli::Cli;
pub use pausekit_core::{Error, GcodeError, PauseConfig, Position, Result};
pub use pausekit_postprocess::{Injection, PipelineReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so G-code can go to stdout
/// - RUST_LOG environment variable support
/// - Level raised by `verbosity` (0 info, 1 debug, 2+ trace)
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbosity > 0)
        .with_level(true)
        .with_line_number(verbosity > 1);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Build height for this run.
///
/// An explicit `--machine-height` wins, then the selected printer profile,
/// then the configuration file value.
pub fn resolve_machine_height(cli: &Cli, config: &Config) -> anyhow::Result<f64> {
    if let Some(height) = cli.machine_height {
        return Ok(height);
    }

    let Some(profile) = config.machine.profile.as_deref() else {
        return Ok(config.machine.machine_height);
    };
    let store = config
        .machine
        .profile_store
        .as_deref()
        .with_context(|| format!("profile '{}' selected but no profile store given", profile))?;

    let manager = DeviceManager::load(store)
        .with_context(|| format!("failed to load printer profiles from {}", store.display()))?;
    let height = manager
        .machine_height(profile)
        .with_context(|| format!("no printer profile '{}' in {}", profile, store.display()))?;

    tracing::debug!(profile, height, "machine height from printer profile");
    Ok(height)
}

/// Pause configuration for this run: file, then flags, then profile lookup
pub fn resolve_pause_config(cli: &Cli) -> anyhow::Result<PauseConfig> {
    let mut config =
        Config::load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;

    let machine_height = resolve_machine_height(cli, &config)?;
    let pause = config.to_pause_config(machine_height);
    pause.validate().context("invalid pause settings")?;
    Ok(pause)
}

/// Run one rewrite as described by `cli`
pub fn run(cli: &Cli) -> anyhow::Result<PipelineReport> {
    let pause = resolve_pause_config(cli)?;
    tracing::info!(
        pause_height = pause.pause_height,
        park_x = pause.park_x,
        park_y = pause.park_y,
        machine_height = pause.max_machine_height,
        "pause settings"
    );
    let pipeline = PausePipeline::new(pause);

    let input: Box<dyn BufRead> = if cli.reads_stdin() {
        Box::new(io::stdin().lock())
    } else {
        let reader = GcodeFileReader::new(&cli.input)
            .with_context(|| format!("cannot read {}", cli.input.display()))?;
        tracing::debug!(path = %reader.path().display(), bytes = reader.file_size(), "input");
        Box::new(reader.open_buffered()?)
    };

    let report = match cli.output_path() {
        Some(path) => {
            let mut writer = GcodeFileWriter::create(path)
                .with_context(|| format!("cannot write {}", path.display()))?;
            let report = pipeline.process_reader(input, &mut writer)?;
            writer
                .finish()
                .with_context(|| format!("cannot replace {}", path.display()))?;
            report
        }
        None => {
            let stdout = io::stdout().lock();
            let mut writer = BufWriter::new(stdout);
            let report = pipeline.process_reader(input, &mut writer)?;
            writer.flush()?;
            report
        }
    };

    Ok(report)
}
