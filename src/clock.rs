// clock.rs

use crate::module::{Module, ProcessArgs};
use crate::port::{normalize, Color, Input, Output, Param, RgbLight, MAX_VOLTAGE};
use crate::state::{bpm_from_cv, round_bpm, SharedTransport, DEFAULT_BPM, MAX_BPM};
use log::debug;

pub const CHANNELS: usize = 3;

/// Beat multipliers selectable per channel. Index 7 is unity.
pub const MULTIPLIERS: [f32; 15] = [
    1.0 / 128.0,
    1.0 / 64.0,
    1.0 / 32.0,
    1.0 / 16.0,
    1.0 / 8.0,
    1.0 / 4.0,
    1.0 / 2.0,
    1.0,
    2.0,
    3.0,
    4.0,
    6.0,
    8.0,
    12.0,
    16.0,
];

pub const MAX_RATE_INDEX: usize = MULTIPLIERS.len() - 1;
pub const UNITY_RATE_INDEX: usize = 7;

/// The accumulator restarts here; the slowest division spans exactly 128 beats.
pub const ACCUMULATOR_WRAP: f64 = 128.0;

/// Multiplier for a rate index, clamped into the table.
pub fn multiplier(rate_index: usize) -> f32 {
    MULTIPLIERS[rate_index.min(MAX_RATE_INDEX)]
}

/// `clamp(round(v / 10 * 14), 0, 14)`
pub fn rate_index_from_cv(voltage: f32) -> usize {
    (normalize(voltage) * MAX_RATE_INDEX as f32)
        .round()
        .clamp(0.0, MAX_RATE_INDEX as f32) as usize
}

/// `clamp(v / 10, 0, 1)`
pub fn offset_from_cv(voltage: f32) -> f32 {
    normalize(voltage).clamp(0.0, 1.0)
}

/// Gate level for a channel: high for the first half of each sub-clock period.
pub fn gate_voltage(accumulator: f64, offset: f32, rate_index: usize) -> f32 {
    let phase = ((accumulator + offset as f64) * multiplier(rate_index) as f64).fract();
    if phase < 0.5 {
        MAX_VOLTAGE
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct ChannelParams {
    pub rate: Param,
    pub offset: Param,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            rate: Param::new(0.0, MAX_RATE_INDEX as f32, UNITY_RATE_INDEX as f32),
            offset: Param::new(0.0, 1.0, 0.0),
        }
    }
}

impl ChannelParams {
    pub fn rate_index(&self) -> usize {
        (self.rate.value().round().max(0.0) as usize).min(MAX_RATE_INDEX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChannelInputs {
    pub rate: Input,
    pub offset: Input,
}

#[derive(Debug, Clone)]
pub struct ClockParams {
    pub run: Param,
    pub bpm: Param,
    pub channels: [ChannelParams; CHANNELS],
}

impl Default for ClockParams {
    fn default() -> Self {
        Self {
            run: Param::switch(true),
            bpm: Param::new(0.0, MAX_BPM as f32, DEFAULT_BPM as f32),
            channels: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClockInputs {
    pub run: Input,
    pub bpm: Input,
    pub channels: [ChannelInputs; CHANNELS],
}

/// Whether the accumulator advances and whether outputs are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub run: bool,
    pub toggle: bool,
}

/// Three-channel gated sub-clock generator.
///
/// Runs from its own tempo controls, or from the shared transport while a
/// broadcaster has sync enabled. In sync the transport's run flag drives the
/// accumulator and the local run switch/CV only mutes the outputs.
pub struct ClockEngine {
    pub params: ClockParams,
    pub inputs: ClockInputs,
    pub outputs: [Output; CHANNELS],
    pub run_light: RgbLight,
    transport: SharedTransport,
    accumulator: f64,
    freq: f32,
    sync_armed: bool,
}

impl ClockEngine {
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            params: ClockParams::default(),
            inputs: ClockInputs::default(),
            outputs: Default::default(),
            run_light: RgbLight::default(),
            transport,
            accumulator: 0.0,
            freq: 0.0,
            sync_armed: true,
        }
    }

    /// Beats elapsed since the last reset.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Master clock frequency in beats per second.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    pub fn run_state(&self) -> RunState {
        let toggle_local = if self.inputs.run.is_connected() {
            self.inputs.run.is_high()
        } else {
            self.params.run.is_on()
        };

        if self.transport.is_sync_enabled() {
            RunState {
                run: self.transport.is_running(),
                toggle: toggle_local,
            }
        } else {
            RunState {
                run: toggle_local,
                toggle: toggle_local,
            }
        }
    }

    fn apply_channel_cv(&mut self) {
        for (params, inputs) in self.params.channels.iter_mut().zip(&self.inputs.channels) {
            if inputs.rate.is_connected() {
                params
                    .rate
                    .set_value(rate_index_from_cv(inputs.rate.voltage()) as f32);
            }
            if inputs.offset.is_connected() {
                params
                    .offset
                    .set_value(offset_from_cv(inputs.offset.voltage()));
            }
        }
    }

    fn local_bpm(&mut self) -> u32 {
        if self.inputs.bpm.is_connected() {
            let bpm = bpm_from_cv(self.inputs.bpm.voltage());
            self.params.bpm.set_value(bpm as f32);
            bpm
        } else {
            round_bpm(self.params.bpm.value())
        }
    }

    fn silence(&mut self) {
        for output in self.outputs.iter_mut() {
            output.set_voltage(0.0);
        }
    }

    fn emit(&mut self) {
        let accumulator = self.accumulator;
        for (output, params) in self.outputs.iter_mut().zip(&self.params.channels) {
            if output.is_connected() {
                output.set_voltage(gate_voltage(
                    accumulator,
                    params.offset.value(),
                    params.rate_index(),
                ));
            }
        }
    }

    fn advance(&mut self, sample_time: f32) {
        self.accumulator += self.freq as f64 * sample_time as f64;
        if self.accumulator >= ACCUMULATOR_WRAP {
            self.accumulator = 0.0;
        }
    }
}

impl Module for ClockEngine {
    fn process(&mut self, args: &ProcessArgs) {
        let state = self.run_state();
        self.run_light.show(Color::Magenta, state.toggle);

        self.apply_channel_cv();

        let synced = self.transport.is_sync_enabled();
        let mut entering_sync = false;
        if synced {
            let bpm = self.transport.bpm();
            self.freq = bpm as f32 / 60.0;
            self.params.bpm.set_value(bpm as f32);
            if self.sync_armed {
                self.sync_armed = false;
                entering_sync = true;
                debug!("Clock entered transport sync at {} BPM", bpm);
            }
        } else {
            self.sync_armed = true;
            self.freq = self.local_bpm() as f32 / 60.0;
        }

        if !state.run || entering_sync {
            self.accumulator = 0.0;
            self.silence();
            return;
        }

        if state.toggle {
            self.emit();
        }
        self.advance(args.sample_time);
    }

    fn name(&self) -> &'static str {
        "chronos"
    }
}
