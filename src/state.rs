use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Highest tempo the transport can carry.
pub const MAX_BPM: u32 = 999;
pub const DEFAULT_BPM: u32 = 120;

/// Tempo and run flag published by a broadcaster and read by clock engines.
///
/// Every field is an independent relaxed atomic: writers never block, readers
/// see whichever write landed last. No arbitration is done between several
/// broadcasters; a reader in the same frame as a writer may observe either the
/// previous or the current value.
#[derive(Debug)]
pub struct TransportState {
    sync_enabled: AtomicBool,
    bpm: AtomicU32,
    run: AtomicBool,
}

/// Handle passed to every module that takes part in transport sync.
pub type SharedTransport = Arc<TransportState>;

impl Default for TransportState {
    fn default() -> Self {
        Self {
            sync_enabled: AtomicBool::new(false),
            bpm: AtomicU32::new(DEFAULT_BPM),
            run: AtomicBool::new(true),
        }
    }
}

impl TransportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedTransport {
        Arc::new(Self::new())
    }

    pub fn set_sync_enabled(&self, enabled: bool) {
        self.sync_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_sync_enabled(&self) -> bool {
        self.sync_enabled.load(Ordering::Relaxed)
    }

    /// Stores the tempo, clamped to `[0, MAX_BPM]`.
    pub fn set_bpm(&self, bpm: u32) {
        self.bpm.store(bpm.min(MAX_BPM), Ordering::Relaxed);
    }

    pub fn bpm(&self) -> u32 {
        self.bpm.load(Ordering::Relaxed)
    }

    pub fn set_running(&self, run: bool) {
        self.run.store(run, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.run.load(Ordering::Relaxed)
    }

    /// Publish run/tempo and claim sync in one call.
    pub fn publish(&self, run: bool, bpm: u32) {
        self.set_bpm(bpm);
        self.set_running(run);
        self.set_sync_enabled(true);
    }
}

/// Round a 0-999 tempo control value to a whole BPM.
pub fn round_bpm(value: f32) -> u32 {
    value.round().clamp(0.0, MAX_BPM as f32) as u32
}

/// Map a tempo CV onto the tempo range: `round(clamp(v / 10, 0, 1) * 999)`.
pub fn bpm_from_cv(voltage: f32) -> u32 {
    let cv = crate::port::normalize(voltage).clamp(0.0, 1.0);
    round_bpm(cv * MAX_BPM as f32)
}
