use crate::config::PatchConfig;
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a Syn/Chronos/Datawave patch offline", long_about = None)]
pub struct Args {
    /// Patch description (TOML, JSON or YAML)
    #[arg(short, long)]
    pub patch: Option<PathBuf>,

    /// Length of the render in seconds
    #[arg(short, long)]
    pub seconds: Option<f32>,

    /// Sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<f32>,

    /// Tempo broadcast by the transport (or used locally with --no-sync)
    #[arg(short, long)]
    pub bpm: Option<f32>,

    /// Leave the transport broadcaster out of the patch
    #[arg(long)]
    pub no_sync: bool,

    /// Seed for the random generator
    #[arg(long)]
    pub seed: Option<u32>,

    /// Random distribution mode (0-4)
    #[arg(short, long)]
    pub mode: Option<usize>,

    /// Write the rendered voltages to a 4-channel WAV file
    #[arg(long)]
    pub wav: Option<PathBuf>,

    /// Only log to the log file
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Apply command line overrides on top of a loaded patch.
    pub fn apply(&self, patch: &mut PatchConfig) {
        if let Some(seconds) = self.seconds {
            patch.render.seconds = seconds;
        }
        if let Some(sample_rate) = self.sample_rate {
            patch.render.sample_rate = sample_rate;
        }
        if let Some(bpm) = self.bpm {
            info!("Tempo overridden to {} BPM", bpm);
            patch.transport.bpm = bpm;
            patch.clock.bpm = bpm;
        }
        if self.no_sync {
            info!("Transport broadcaster disabled from the command line");
            patch.transport.enabled = false;
        }
        if let Some(seed) = self.seed {
            patch.random.seed = seed;
        }
        if let Some(mode) = self.mode {
            patch.random.mode = mode;
        }
    }
}
