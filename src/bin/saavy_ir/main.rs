//! saavy_ir - terminal convolution reverb
//!
//! Run with: cargo run -- --sample voice.wav --ir 1=hall.wav --ir 3=plate.wav

mod app;
mod audio;
mod loader;
mod ui;

use std::{path::PathBuf, str::FromStr, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use saavy_ir::SLOT_COUNT;
use tracing_subscriber::EnvFilter;

/// Multi-band convolution reverb with a terminal UI.
#[derive(Parser, Debug)]
#[command(name = "saavy_ir", version, about)]
pub struct Args {
    /// Dry sample to play (WAV)
    #[arg(long)]
    pub sample: Option<PathBuf>,

    /// Impulse response for a module, as `<module>=<wav>` (module 1..=4). Repeatable.
    #[arg(long = "ir", value_name = "MODULE=WAV")]
    pub irs: Vec<IrArg>,

    /// Initial dry/wet mix in percent
    #[arg(long, default_value_t = 50.0)]
    pub mix: f32,

    /// Where to write logs (the terminal belongs to the UI)
    #[arg(long, default_value = "saavy_ir.log")]
    pub log_file: PathBuf,
}

/// `--ir` argument: zero-based slot plus file.
#[derive(Clone, Debug)]
pub struct IrArg {
    pub slot: usize,
    pub path: PathBuf,
}

impl FromStr for IrArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, path) = s
            .split_once('=')
            .ok_or_else(|| format!("expected MODULE=WAV, got `{s}`"))?;
        let module: usize = module
            .trim()
            .parse()
            .map_err(|_| format!("`{module}` is not a module number"))?;
        if module == 0 || module > SLOT_COUNT {
            return Err(format!("module must be 1..={SLOT_COUNT}, got {module}"));
        }
        Ok(Self {
            slot: module - 1,
            path: PathBuf::from(path),
        })
    }
}

fn init_logging(path: &PathBuf) -> EyreResult<()> {
    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args.log_file)?;

    app::run(args)
}
