//! Stochastic CV generator
//!
//! Samples a new random target on every rising clock edge, shapes it with one
//! of five distributions, scales and offsets it, then slews the output towards
//! it. Nothing happens while the clock input is unpatched; the output simply
//! holds its last value.
//!
//! The generator is reproducible: the same seed fed through the reseed trigger
//! yields the same sequence of targets for the same sequence of clock edges.

mod distribution;
mod entropy;

pub use distribution::{Mode, MODE_COUNT};
pub use entropy::{EntropySource, SequenceEntropy, ThreadEntropy, MAX_SEED};

use crate::module::{Module, ProcessArgs};
use crate::port::{Color, Input, Output, Param, RgbLight, MAX_VOLTAGE};
use crate::trigger::EdgeDetector;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Below this slew time the output follows the target immediately.
pub const MIN_SLEW: f32 = 10.0;
pub const MAX_SLEW: f32 = 10_000.0;
/// Slew time factor applied by the 10x switch.
pub const SLEW_MULTIPLIER: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct StochasticParams {
    pub seed: u32,
    pub scale: Param,
    pub offset: Param,
    pub slew: Param,
    pub tenx: Param,
    pub mode_button: Param,
    pub mode: Param,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: Param::new(0.0, MAX_VOLTAGE, MAX_VOLTAGE),
            offset: Param::new(0.0, MAX_VOLTAGE, 0.0),
            slew: Param::new(0.0, MAX_SLEW, 0.0),
            tenx: Param::switch(false),
            mode_button: Param::switch(false),
            mode: Param::new(0.0, (MODE_COUNT - 1) as f32, 0.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StochasticInputs {
    pub seed: Input,
    pub scale: Input,
    pub mode: Input,
    pub offset: Input,
    pub slew: Input,
    pub tenx: Input,
    pub generate_seed: Input,
    pub reseed: Input,
    pub clock: Input,
}

/// Mode index for a mode CV: `round(v / 2)`, clamped to the mode table.
pub fn mode_index_from_cv(voltage: f32) -> usize {
    (voltage / 2.0).round().clamp(0.0, (MODE_COUNT - 1) as f32) as usize
}

/// Move `current` towards `target` by at most `step`, never past it.
pub fn slew_towards(current: f32, target: f32, step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= step {
        target
    } else {
        current + step.copysign(delta)
    }
}

pub struct StochasticEngine {
    pub params: StochasticParams,
    pub inputs: StochasticInputs,
    pub output: Output,
    pub mode_light: RgbLight,
    pub tenx_light: RgbLight,
    rng: StdRng,
    entropy: Box<dyn EntropySource>,
    clock_trigger: EdgeDetector,
    reseed_trigger: EdgeDetector,
    seed_trigger: EdgeDetector,
    mode_button: EdgeDetector,
    mode: Mode,
    tenx: bool,
    target: f32,
    current: f32,
    samples_drawn: u64,
}

impl Default for StochasticEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StochasticEngine {
    pub fn new() -> Self {
        Self::with_entropy(Box::new(ThreadEntropy))
    }

    pub fn with_entropy(entropy: Box<dyn EntropySource>) -> Self {
        let params = StochasticParams::default();
        Self {
            rng: StdRng::seed_from_u64(params.seed as u64),
            params,
            inputs: StochasticInputs::default(),
            output: Output::default(),
            mode_light: RgbLight::default(),
            tenx_light: RgbLight::default(),
            entropy,
            clock_trigger: EdgeDetector::trigger(),
            reseed_trigger: EdgeDetector::trigger(),
            seed_trigger: EdgeDetector::trigger(),
            mode_button: EdgeDetector::button(),
            mode: Mode::default(),
            tenx: false,
            target: 0.0,
            current: 0.0,
            samples_drawn: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.params.mode.set_value(mode.index() as f32);
    }

    pub fn seed(&self) -> u32 {
        self.params.seed
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.params.seed = seed.min(MAX_SEED);
    }

    /// Restart the generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        debug!("Random generator reseeded with {}", seed);
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_tenx(&self) -> bool {
        self.tenx
    }

    /// Clock edges that produced a new target since construction.
    pub fn samples_drawn(&self) -> u64 {
        self.samples_drawn
    }

    fn update_mode(&mut self) {
        if self.inputs.mode.is_connected() {
            let index = mode_index_from_cv(self.inputs.mode.voltage());
            self.params.mode.set_value(index as f32);
        } else if self.mode_button.process(self.params.mode_button.value()) {
            let next = Mode::from_index(self.params.mode.value() as usize).next();
            self.params.mode.set_value(next.index() as f32);
            debug!("Random mode switched to {}", next);
        }

        self.mode = Mode::from_index(self.params.mode.value() as usize);
        self.mode_light.set_color(self.mode.color());
    }

    fn update_tenx(&mut self) {
        self.tenx = if self.inputs.tenx.is_connected() {
            self.inputs.tenx.is_high()
        } else {
            self.params.tenx.is_on()
        };
        self.tenx_light.show(Color::Cyan, self.tenx);
    }

    fn process_seed_triggers(&mut self) {
        if self.inputs.generate_seed.is_connected()
            && self
                .seed_trigger
                .process(self.inputs.generate_seed.voltage())
        {
            let seed = self.entropy.next_seed();
            self.set_seed(seed);
            debug!("Generated seed {}", self.params.seed);
        }

        if self.inputs.reseed.is_connected()
            && self.reseed_trigger.process(self.inputs.reseed.voltage())
        {
            let scaled = self.params.seed as f64 * self.inputs.seed.cv_or_unity() as f64;
            self.reseed(scaled.max(0.0) as u64);
        }
    }

    /// Draw a new target from two uniform samples.
    fn draw_target(&mut self) {
        let a: f32 = self.rng.gen();
        let b: f32 = self.rng.gen();
        let scale = self.params.scale.value() * self.inputs.scale.cv_or_unity();
        let offset = self.params.offset.value() * self.inputs.offset.cv_or_unity();

        self.target = self.mode.combine(a, b) * scale + offset;
        self.samples_drawn += 1;
    }

    fn slew(&mut self) {
        let slew = self.params.slew.value() * self.inputs.slew.cv_or_unity();

        let next = if slew < MIN_SLEW {
            self.target
        } else {
            let slew = if self.tenx {
                slew * SLEW_MULTIPLIER
            } else {
                slew
            };
            slew_towards(self.current, self.target, 1.0 / slew)
        };

        self.current = next.clamp(0.0, MAX_VOLTAGE);
    }
}

impl Module for StochasticEngine {
    fn process(&mut self, _args: &ProcessArgs) {
        self.update_mode();
        self.update_tenx();

        if !self.inputs.clock.is_connected() {
            return;
        }

        self.process_seed_triggers();

        if self.clock_trigger.process(self.inputs.clock.voltage()) {
            self.draw_target();
        }

        self.slew();
        self.output.set_voltage(self.current);
    }

    fn name(&self) -> &'static str {
        "datawave"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_cv_mapping() {
        assert_eq!(mode_index_from_cv(0.0), 0);
        assert_eq!(mode_index_from_cv(2.9), 1);
        assert_eq!(mode_index_from_cv(3.0), 2);
        assert_eq!(mode_index_from_cv(8.0), 4);
        assert_eq!(mode_index_from_cv(10.0), 4);
        assert_eq!(mode_index_from_cv(-5.0), 0);
    }

    #[test]
    fn test_slew_towards_never_overshoots() {
        assert_eq!(slew_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(slew_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(slew_towards(1.0, 0.0, 0.25), 0.75);
        assert_eq!(slew_towards(0.1, 0.0, 0.25), 0.0);
    }

    #[test]
    fn test_mode_light_follows_mode() {
        let mut engine = StochasticEngine::with_entropy(Box::new(SequenceEntropy::new(vec![1])));
        engine.inputs.mode.set_voltage(6.0);
        engine.process(&ProcessArgs::new(48_000.0));
        assert_eq!(engine.mode(), Mode::Triangle);
        assert_eq!(engine.mode_light.brightness(), [0.0, 1.0, 0.0]);
    }
}
