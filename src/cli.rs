//! Command-line interface for pausekit.
//!
//! Flags given on the command line override the configuration file.

use clap::Parser;
use pausekit_settings::Config;
use std::path::{Path, PathBuf};

/// Path value that stands for stdin or stdout
pub const STDIO_PATH: &str = "-";

/// pausekit - insert a pause-at-height into sliced G-code
#[derive(Parser, Debug)]
#[command(name = "pausekit")]
#[command(author, version, about, long_about = None)]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
pub struct Cli {
    /// G-code file to process ("-" reads stdin)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the result (default: rewrite INPUT in place, "-" for stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Configuration file (.toml or .json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print height to pause at, in mm
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub pause_height: Option<f64>,

    /// Dwell while parked
    #[arg(long, value_name = "SECONDS")]
    pub park_duration: Option<u32>,

    /// Park X position
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub park_x: Option<f64>,

    /// Park Y position
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub park_y: Option<f64>,

    /// Extra head lift while parked
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub move_z: Option<f64>,

    /// Filament retraction length
    #[arg(long = "retract", value_name = "MM", allow_negative_numbers = true)]
    pub retract_amount: Option<f64>,

    /// Machine build height, overrides any profile
    #[arg(long, value_name = "MM")]
    pub machine_height: Option<f64>,

    /// Printer profile id or name to take the build height from
    #[arg(long, value_name = "ID")]
    pub profile: Option<String>,

    /// Printer profile store (JSON)
    #[arg(long, value_name = "PATH")]
    pub profile_store: Option<PathBuf>,

    /// Print the run report as JSON on stderr
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Copy every flag that was given into `config`
    pub fn apply_overrides(&self, config: &mut Config) {
        let pause = &mut config.pause;
        if let Some(v) = self.pause_height {
            pause.pause_height = v;
        }
        if let Some(v) = self.park_duration {
            pause.park_duration = v;
        }
        if let Some(v) = self.park_x {
            pause.park_x = v;
        }
        if let Some(v) = self.park_y {
            pause.park_y = v;
        }
        if let Some(v) = self.move_z {
            pause.move_z = v;
        }
        if let Some(v) = self.retract_amount {
            pause.retract_amount = v;
        }

        let machine = &mut config.machine;
        if let Some(v) = self.machine_height {
            machine.machine_height = v;
        }
        if let Some(profile) = &self.profile {
            machine.profile = Some(profile.clone());
        }
        if let Some(store) = &self.profile_store {
            machine.profile_store = Some(store.clone());
        }
    }

    /// Whether INPUT is `-`
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == STDIO_PATH
    }

    /// Resolved output path; `None` means stdout
    pub fn output_path(&self) -> Option<&Path> {
        match &self.output {
            Some(path) if path.as_os_str() == STDIO_PATH => None,
            Some(path) => Some(path.as_path()),
            None if self.reads_stdin() => None,
            None => Some(self.input.as_path()),
        }
    }
}
