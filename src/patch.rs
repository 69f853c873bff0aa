//! Headless host for one broadcaster, one clock and one random generator
//!
//! Owns the modules, routes the single cable between them (a clock output into
//! the random generator's clock input) and runs them in a fixed order each
//! sample: broadcaster, clock, random.

use crate::clock::{ClockEngine, CHANNELS};
use crate::config::PatchConfig;
use crate::module::{Module, ProcessArgs};
use crate::state::{SharedTransport, TransportState};
use crate::stochastic::{EntropySource, Mode, StochasticEngine, ThreadEntropy};
use crate::transport::TransportBroadcaster;
use log::info;

/// Voltages produced by one sample of the patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub gates: [f32; CHANNELS],
    pub cv: f32,
}

pub struct Patch {
    transport: SharedTransport,
    pub broadcaster: Option<TransportBroadcaster>,
    pub clock: ClockEngine,
    pub random: StochasticEngine,
    /// Clock output feeding the random generator's clock input.
    clock_route: Option<usize>,
    args: ProcessArgs,
}

impl Patch {
    pub fn new(sample_rate: f32) -> Self {
        let transport = TransportState::shared();
        Self {
            clock: ClockEngine::new(transport.clone()),
            broadcaster: None,
            random: StochasticEngine::new(),
            transport,
            clock_route: None,
            args: ProcessArgs::new(sample_rate),
        }
    }

    pub fn from_config(config: &PatchConfig) -> Self {
        Self::from_config_with_entropy(config, Box::new(ThreadEntropy))
    }

    pub fn from_config_with_entropy(
        config: &PatchConfig,
        entropy: Box<dyn EntropySource>,
    ) -> Self {
        let mut patch = Self::new(config.render.sample_rate);
        patch.random = StochasticEngine::with_entropy(entropy);

        if config.transport.enabled {
            let mut syn = TransportBroadcaster::new(patch.transport.clone());
            syn.params.bpm.set_value(config.transport.bpm);
            syn.params.run.set_value(bool_value(config.transport.run));
            patch.broadcaster = Some(syn);
        }

        let clock = &mut patch.clock;
        clock.params.bpm.set_value(config.clock.bpm);
        clock.params.run.set_value(bool_value(config.clock.run));
        for (params, channel) in clock.params.channels.iter_mut().zip(&config.clock.channels) {
            params.rate.set_value(channel.rate as f32);
            params.offset.set_value(channel.offset);
        }

        let random = &mut patch.random;
        random.set_mode(Mode::from_index(config.random.mode));
        random.set_seed(config.random.seed);
        random.reseed(config.random.seed as u64);
        random.params.scale.set_value(config.random.scale);
        random.params.offset.set_value(config.random.offset);
        random.params.slew.set_value(config.random.slew);
        random.params.tenx.set_value(bool_value(config.random.tenx));

        patch.route_clock(config.random.clock_channel);
        info!(
            "Patch built: {} -> {} -> {} (broadcaster {}, random clocked from {:?})",
            patch.broadcaster.as_ref().map_or("none", |syn| syn.name()),
            patch.clock.name(),
            patch.random.name(),
            if config.transport.enabled { "on" } else { "off" },
            patch.clock_route
        );
        patch
    }

    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    pub fn process_args(&self) -> ProcessArgs {
        self.args
    }

    /// Patch clock output `channel` into the random generator, or unpatch it.
    pub fn route_clock(&mut self, channel: Option<usize>) {
        self.clock_route = channel.filter(|&c| c < CHANNELS);
        if self.clock_route.is_none() {
            self.random.inputs.clock.disconnect();
        }
    }

    /// Take the broadcaster out of the rack.
    pub fn remove_broadcaster(&mut self) {
        if let Some(mut syn) = self.broadcaster.take() {
            syn.on_remove();
        }
    }

    /// Run every module once.
    pub fn process(&mut self) -> Frame {
        let args = self.args;
        if let Some(syn) = self.broadcaster.as_mut() {
            syn.process(&args);
        }
        self.clock.process(&args);

        if let Some(channel) = self.clock_route {
            let gate = self.clock.outputs[channel].voltage();
            self.random.inputs.clock.set_voltage(gate);
        }
        self.random.process(&args);

        Frame {
            gates: [
                self.clock.outputs[0].voltage(),
                self.clock.outputs[1].voltage(),
                self.clock.outputs[2].voltage(),
            ],
            cv: self.random.output.voltage(),
        }
    }
}

fn bool_value(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
