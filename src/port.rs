//! Host-side port model
//!
//! Parameters, inputs, outputs and indicator lights as a rack host exposes
//! them to a module. Voltages follow the 0-10V convention; a CV is always
//! normalised through `voltage / 10` before it is mapped onto a parameter.

/// Upper bound of the standard CV range.
pub const MAX_VOLTAGE: f32 = 10.0;

/// Normalise a CV to the unit range without clamping.
pub fn normalize(voltage: f32) -> f32 {
    voltage / MAX_VOLTAGE
}

/// A continuous control. Writes are clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param {
    value: f32,
    min: f32,
    max: f32,
    default: f32,
}

impl Param {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self {
            value: default,
            min,
            max,
            default,
        }
    }

    /// A two-position switch, on when the value is above zero.
    pub const fn switch(default_on: bool) -> Self {
        Self::new(0.0, 1.0, if default_on { 1.0 } else { 0.0 })
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn is_on(&self) -> bool {
        self.value > 0.0
    }

    pub fn reset(&mut self) {
        self.value = self.default;
    }
}

/// An input jack. A disconnected input carries no voltage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Input {
    voltage: Option<f32>,
}

impl Input {
    pub fn connected(voltage: f32) -> Self {
        Self {
            voltage: Some(voltage),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.voltage.is_some()
    }

    /// Voltage on the jack, 0V when nothing is patched.
    pub fn voltage(&self) -> f32 {
        self.voltage.unwrap_or(0.0)
    }

    /// Patch a cable carrying `voltage`, or update the voltage on it.
    pub fn set_voltage(&mut self, voltage: f32) {
        self.voltage = Some(voltage);
    }

    pub fn disconnect(&mut self) {
        self.voltage = None;
    }

    /// `voltage / 10` when connected, otherwise unity.
    pub fn cv_or_unity(&self) -> f32 {
        self.voltage.map(normalize).unwrap_or(1.0)
    }

    /// Gate reading: true above 0V.
    pub fn is_high(&self) -> bool {
        self.voltage() > 0.0
    }
}

/// An output jack. Holds the last voltage written to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Output {
    voltage: f32,
    connected: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            voltage: 0.0,
            connected: true,
        }
    }
}

impl Output {
    pub fn voltage(&self) -> f32 {
        self.voltage
    }

    pub fn set_voltage(&mut self, voltage: f32) {
        self.voltage = voltage;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

/// Indicator colours used by the modules' RGB lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Off,
    Cyan,
    Magenta,
    Yellow,
    Green,
    White,
}

impl Color {
    fn rgb(self) -> [f32; 3] {
        match self {
            Color::Off => [0.0, 0.0, 0.0],
            Color::Cyan => [0.0, 1.0, 1.0],
            Color::Magenta => [1.0, 0.0, 1.0],
            Color::Yellow => [1.0, 1.0, 0.0],
            Color::Green => [0.0, 1.0, 0.0],
            Color::White => [1.0, 1.0, 1.0],
        }
    }
}

/// Three-segment light. Brightness is always kept in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RgbLight {
    brightness: [f32; 3],
}

impl RgbLight {
    pub fn set_brightness(&mut self, segment: usize, brightness: f32) {
        if let Some(b) = self.brightness.get_mut(segment) {
            *b = brightness.clamp(0.0, 1.0);
        }
    }

    pub fn brightness(&self) -> [f32; 3] {
        self.brightness
    }

    pub fn set_color(&mut self, color: Color) {
        for (segment, level) in color.rgb().into_iter().enumerate() {
            self.set_brightness(segment, level);
        }
    }

    /// Light `color` when `on`, otherwise switch every segment off.
    pub fn show(&mut self, color: Color, on: bool) {
        self.set_color(if on { color } else { Color::Off });
    }

    pub fn is_lit(&self) -> bool {
        self.brightness.iter().any(|&b| b > 0.0)
    }
}
