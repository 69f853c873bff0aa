//! Transport broadcaster
//!
//! Publishes one run/tempo pair to every synced clock engine for as long as
//! the broadcaster is in the rack, and revokes sync when it is removed.

use crate::module::{Module, ProcessArgs};
use crate::port::{Color, Input, Param, RgbLight};
use crate::state::{bpm_from_cv, round_bpm, SharedTransport, DEFAULT_BPM, MAX_BPM};
use log::debug;

#[derive(Debug, Clone)]
pub struct BroadcasterParams {
    pub run: Param,
    pub bpm: Param,
}

impl Default for BroadcasterParams {
    fn default() -> Self {
        Self {
            run: Param::switch(true),
            bpm: Param::new(0.0, MAX_BPM as f32, DEFAULT_BPM as f32),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BroadcasterInputs {
    pub run: Input,
    pub bpm: Input,
}

pub struct TransportBroadcaster {
    pub params: BroadcasterParams,
    pub inputs: BroadcasterInputs,
    pub run_light: RgbLight,
    transport: SharedTransport,
    display_bpm: u32,
    published: bool,
}

impl TransportBroadcaster {
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            params: BroadcasterParams::default(),
            inputs: BroadcasterInputs::default(),
            run_light: RgbLight::default(),
            transport,
            display_bpm: DEFAULT_BPM,
            published: false,
        }
    }

    /// Tempo last published, for a tempo readout.
    pub fn display_bpm(&self) -> u32 {
        self.display_bpm
    }

    fn resolve_run(&self) -> bool {
        if self.inputs.run.is_connected() {
            self.inputs.run.is_high()
        } else {
            self.params.run.is_on()
        }
    }

    fn resolve_bpm(&mut self) -> u32 {
        if self.inputs.bpm.is_connected() {
            let bpm = bpm_from_cv(self.inputs.bpm.voltage());
            // knob follows the CV
            self.params.bpm.set_value(bpm as f32);
            bpm
        } else {
            round_bpm(self.params.bpm.value())
        }
    }

    fn revoke(&mut self) {
        if self.published {
            self.transport.set_sync_enabled(false);
            self.published = false;
            debug!("Transport broadcaster removed, sync revoked");
        }
    }
}

impl Module for TransportBroadcaster {
    fn process(&mut self, _args: &ProcessArgs) {
        let bpm = self.resolve_bpm();
        let run = self.resolve_run();

        self.transport.publish(run, bpm);
        self.published = true;
        self.display_bpm = bpm;

        self.run_light.show(Color::Yellow, run);
    }

    fn on_remove(&mut self) {
        self.revoke();
    }

    fn name(&self) -> &'static str {
        "syn"
    }
}

impl Drop for TransportBroadcaster {
    fn drop(&mut self) {
        self.revoke();
    }
}
