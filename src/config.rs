// config.rs

use crate::clock::{CHANNELS, MAX_RATE_INDEX};
use crate::error::{Error, Result};
use crate::state::MAX_BPM;
use crate::stochastic::{MAX_SEED, MAX_SLEW, MODE_COUNT};
use config::{Config, Environment, File};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

/// Prefix for environment overrides, e.g. `CHRONOWAVE_TRANSPORT__BPM=140`.
pub const ENV_PREFIX: &str = "CHRONOWAVE";

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
pub const DEFAULT_SECONDS: f32 = 8.0;
const MIN_SAMPLE_RATE: f32 = 1_000.0;
const MAX_SAMPLE_RATE: f32 = 384_000.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub seconds: f32,
    pub sample_rate: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_SECONDS,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Broadcaster settings. With `enabled = false` the patch has no broadcaster
/// and the clock runs from its own tempo.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub enabled: bool,
    pub bpm: f32,
    pub run: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bpm: 120.0,
            run: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Index into the multiplier table.
    pub rate: usize,
    pub offset: f32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            rate: 7,
            offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub bpm: f32,
    pub run: bool,
    pub channels: Vec<ChannelConfig>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            run: true,
            channels: vec![
                ChannelConfig::default(),
                ChannelConfig {
                    rate: 8,
                    offset: 0.0,
                },
                ChannelConfig {
                    rate: 5,
                    offset: 0.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub mode: usize,
    pub seed: u32,
    pub scale: f32,
    pub offset: f32,
    pub slew: f32,
    pub tenx: bool,
    /// Clock channel patched into the clock input; `None` leaves it unpatched.
    pub clock_channel: Option<usize>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            mode: 0,
            seed: 0,
            scale: 10.0,
            offset: 0.0,
            slew: 0.0,
            tenx: false,
            clock_channel: Some(1),
        }
    }
}

/// Everything needed to build and render a patch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub render: RenderConfig,
    pub transport: TransportConfig,
    pub clock: ClockConfig,
    pub random: RandomConfig,
}

impl PatchConfig {
    /// Layer built-in defaults, an optional patch file and the environment.
    ///
    /// The result is not validated; CLI overrides go on top first.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading patch from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let patch: PatchConfig = builder.build()?.try_deserialize()?;
        debug!("Parsed patch configuration: {:?}", patch);
        Ok(patch)
    }

    pub fn total_frames(&self) -> u64 {
        (self.render.seconds as f64 * self.render.sample_rate as f64).round() as u64
    }

    pub fn validate(&self) -> Result<()> {
        let render = &self.render;
        if !(render.seconds.is_finite() && render.seconds > 0.0) {
            return invalid(format!("render.seconds must be positive, got {}", render.seconds));
        }
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&render.sample_rate) {
            return invalid(format!(
                "render.sample_rate must be within {}..={}, got {}",
                MIN_SAMPLE_RATE, MAX_SAMPLE_RATE, render.sample_rate
            ));
        }

        check_bpm("transport.bpm", self.transport.bpm)?;
        check_bpm("clock.bpm", self.clock.bpm)?;

        if self.clock.channels.len() > CHANNELS {
            return invalid(format!(
                "clock.channels holds at most {} entries, got {}",
                CHANNELS,
                self.clock.channels.len()
            ));
        }
        for (i, channel) in self.clock.channels.iter().enumerate() {
            if channel.rate > MAX_RATE_INDEX {
                return invalid(format!(
                    "clock.channels[{}].rate must be within 0..={}, got {}",
                    i, MAX_RATE_INDEX, channel.rate
                ));
            }
            check_range(&format!("clock.channels[{}].offset", i), channel.offset, 0.0, 1.0)?;
        }

        let random = &self.random;
        if random.mode >= MODE_COUNT {
            return invalid(format!(
                "random.mode must be within 0..{}, got {}",
                MODE_COUNT, random.mode
            ));
        }
        if random.seed > MAX_SEED {
            return invalid(format!(
                "random.seed must be at most {}, got {}",
                MAX_SEED, random.seed
            ));
        }
        check_range("random.scale", random.scale, 0.0, 10.0)?;
        check_range("random.offset", random.offset, 0.0, 10.0)?;
        check_range("random.slew", random.slew, 0.0, MAX_SLEW)?;
        if let Some(channel) = random.clock_channel {
            if channel >= CHANNELS {
                return invalid(format!(
                    "random.clock_channel must be below {}, got {}",
                    CHANNELS, channel
                ));
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> Result<()> {
    Err(Error::Config(msg))
}

fn check_bpm(key: &str, bpm: f32) -> Result<()> {
    check_range(key, bpm, 0.0, MAX_BPM as f32)
}

fn check_range(key: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        invalid(format!(
            "{} must be within {}..={}, got {}",
            key, min, max, value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let patch = PatchConfig::default();
        assert!(patch.validate().is_ok());
        assert_eq!(patch.clock.channels.len(), CHANNELS);
        assert_eq!(patch.total_frames(), 352_800);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut patch = PatchConfig::default();
        patch.clock.channels[2].rate = 15;
        assert!(matches!(patch.validate(), Err(Error::Config(_))));

        let mut patch = PatchConfig::default();
        patch.random.clock_channel = Some(3);
        assert!(patch.validate().is_err());

        let mut patch = PatchConfig::default();
        patch.render.seconds = 0.0;
        assert!(patch.validate().is_err());

        let mut patch = PatchConfig::default();
        patch.transport.bpm = 1000.0;
        assert!(patch.validate().is_err());
    }
}
