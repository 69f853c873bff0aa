//! Per-sample module contract

/// Timing information handed to every module on each sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessArgs {
    pub sample_rate: f32,
    /// Seconds per sample.
    pub sample_time: f32,
}

impl ProcessArgs {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            sample_time: 1.0 / sample_rate,
        }
    }
}

/// A rack module driven once per sample by the host.
///
/// `process` runs inside the audio callback: it must not block, allocate or
/// fail. Every input combination is a normal operating condition.
pub trait Module {
    fn process(&mut self, args: &ProcessArgs);

    /// Called by the host when the module is taken out of the rack.
    fn on_remove(&mut self) {}

    fn name(&self) -> &'static str;
}
