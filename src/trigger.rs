//! Hysteresis edge detection for triggers and buttons

/// Low threshold for trigger inputs.
pub const TRIGGER_LOW: f32 = 0.1;
/// High threshold for trigger inputs.
pub const TRIGGER_HIGH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeState {
    /// Nothing observed yet; the first sample settles the state without firing.
    Unknown,
    Low,
    High,
}

/// Two-threshold edge detector.
///
/// Goes high when the input rises above `high` and low again only once the
/// input falls to or below `low`. `process` reports the low-to-high transition,
/// so an action keyed on it happens once per press or pulse.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    state: EdgeState,
    low: f32,
    high: f32,
}

impl EdgeDetector {
    pub fn new(low: f32, high: f32) -> Self {
        Self {
            state: EdgeState::Unknown,
            low,
            high,
        }
    }

    /// Detector for 0.1V/2V trigger and clock inputs.
    pub fn trigger() -> Self {
        Self::new(TRIGGER_LOW, TRIGGER_HIGH)
    }

    /// Detector for a momentary button: fires on any value above zero and
    /// re-arms only when the value is back at exactly zero. Starts armed, so a
    /// button already held at construction counts as a press.
    pub fn button() -> Self {
        Self {
            state: EdgeState::Low,
            low: 0.0,
            high: 0.0,
        }
    }

    /// Feed one sample. Returns true on the rising edge.
    pub fn process(&mut self, input: f32) -> bool {
        match self.state {
            EdgeState::Unknown => {
                self.state = if input > self.high {
                    EdgeState::High
                } else {
                    EdgeState::Low
                };
                false
            }
            EdgeState::Low => {
                if input > self.high {
                    self.state = EdgeState::High;
                    true
                } else {
                    false
                }
            }
            EdgeState::High => {
                if input <= self.low {
                    self.state = EdgeState::Low;
                }
                false
            }
        }
    }

    pub fn is_high(&self) -> bool {
        self.state == EdgeState::High
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::trigger()
    }
}
