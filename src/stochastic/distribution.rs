use crate::port::Color;

/// How two uniform draws are folded into one value in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Uniform,
    /// Weighted towards 0.
    InverseLinear,
    /// Weighted towards 1.
    Linear,
    /// Peaks at 0.5.
    Triangle,
    /// Peaks at both ends.
    InverseTriangle,
}

pub const MODE_COUNT: usize = 5;

impl Mode {
    pub const ALL: [Mode; MODE_COUNT] = [
        Mode::Uniform,
        Mode::InverseLinear,
        Mode::Linear,
        Mode::Triangle,
        Mode::InverseTriangle,
    ];

    /// Mode for an index; anything past the end is the last mode.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(MODE_COUNT - 1)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % MODE_COUNT]
    }

    pub fn color(self) -> Color {
        match self {
            Mode::Uniform => Color::Cyan,
            Mode::InverseLinear => Color::Magenta,
            Mode::Linear => Color::Yellow,
            Mode::Triangle => Color::Green,
            Mode::InverseTriangle => Color::White,
        }
    }

    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            Mode::Uniform => a,
            Mode::InverseLinear => a.min(b),
            Mode::Linear => a.max(b),
            Mode::Triangle => (a + b) / 2.0,
            Mode::InverseTriangle => {
                let m = (a + b) / 2.0;
                if m > 0.5 {
                    m - 0.5
                } else {
                    m + 0.5
                }
            }
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Uniform => "uniform",
            Mode::InverseLinear => "inverse-linear",
            Mode::Linear => "linear",
            Mode::Triangle => "triangle",
            Mode::InverseTriangle => "inverse-triangle",
        };
        write!(f, "{}", name)
    }
}
