//! Offline rendering
//!
//! Runs a patch for a fixed number of frames on a worker thread, optionally
//! writing the voltages to a WAV file, and reports progress over a channel at
//! block boundaries.

use crate::clock::CHANNELS;
use crate::error::{Error, Result};
use crate::patch::{Frame, Patch};
use crate::port::MAX_VOLTAGE;
use crossbeam::channel::{self, Receiver, Sender};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::thread;

/// Frames rendered between progress messages.
pub const BLOCK_SIZE: u64 = 4096;

/// Statistics gathered over a render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub frames: u64,
    pub sample_rate: f32,
    /// Low-to-high transitions seen on each gate output.
    pub rising_edges: [u64; CHANNELS],
    /// Frames each gate output spent at 10V.
    pub high_frames: [u64; CHANNELS],
    pub cv_min: f32,
    pub cv_max: f32,
    pub cv_mean: f32,
    /// Random targets drawn during the render.
    pub resamples: u64,
}

impl RenderReport {
    pub fn seconds(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    /// Fraction of the render a gate spent high.
    pub fn duty(&self, channel: usize) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.high_frames[channel] as f64 / self.frames as f64
    }
}

#[derive(Debug)]
struct ReportBuilder {
    frames: u64,
    last_gates: [f32; CHANNELS],
    rising_edges: [u64; CHANNELS],
    high_frames: [u64; CHANNELS],
    cv_min: f32,
    cv_max: f32,
    cv_sum: f64,
    /// Random generator draw count when the render started.
    drawn_before: u64,
}

impl ReportBuilder {
    fn new(drawn_before: u64) -> Self {
        Self {
            frames: 0,
            last_gates: [0.0; CHANNELS],
            rising_edges: [0; CHANNELS],
            high_frames: [0; CHANNELS],
            cv_min: f32::INFINITY,
            cv_max: f32::NEG_INFINITY,
            cv_sum: 0.0,
            drawn_before,
        }
    }

    fn observe(&mut self, frame: &Frame) {
        for (i, &gate) in frame.gates.iter().enumerate() {
            if gate > 0.0 {
                self.high_frames[i] += 1;
                if self.last_gates[i] <= 0.0 {
                    self.rising_edges[i] += 1;
                }
            }
        }
        self.last_gates = frame.gates;
        self.cv_min = self.cv_min.min(frame.cv);
        self.cv_max = self.cv_max.max(frame.cv);
        self.cv_sum += frame.cv as f64;
        self.frames += 1;
    }

    fn finish(self, patch: &Patch) -> RenderReport {
        let (cv_min, cv_max, cv_mean) = if self.frames == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                self.cv_min,
                self.cv_max,
                (self.cv_sum / self.frames as f64) as f32,
            )
        };
        RenderReport {
            frames: self.frames,
            sample_rate: patch.process_args().sample_rate,
            rising_edges: self.rising_edges,
            high_frames: self.high_frames,
            cv_min,
            cv_max,
            cv_mean,
            resamples: patch.random.samples_drawn() - self.drawn_before,
        }
    }
}

fn wav_spec(sample_rate: f32) -> WavSpec {
    WavSpec {
        channels: (CHANNELS + 1) as u16,
        sample_rate: sample_rate.round() as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

fn write_frame(writer: &mut WavWriter<BufWriter<File>>, frame: &Frame) -> Result<()> {
    for &gate in &frame.gates {
        writer.write_sample(gate / MAX_VOLTAGE)?;
    }
    writer.write_sample(frame.cv / MAX_VOLTAGE)?;
    Ok(())
}

/// Render `frames` samples of `patch` on the current thread.
///
/// Voltages are written to `wav` normalised to `[0, 1]`, gates first, then the
/// random CV. The number of frames done so far is sent on `progress` after
/// every block; a disconnected receiver is ignored.
pub fn render(
    patch: &mut Patch,
    frames: u64,
    wav: Option<&PathBuf>,
    progress: Option<&Sender<u64>>,
) -> Result<RenderReport> {
    let mut writer = match wav {
        Some(path) => {
            info!("Writing rendered voltages to {}", path.display());
            Some(WavWriter::create(path, wav_spec(patch.process_args().sample_rate))?)
        }
        None => None,
    };

    let mut report = ReportBuilder::new(patch.random.samples_drawn());
    for n in 0..frames {
        let frame = patch.process();
        report.observe(&frame);
        if let Some(writer) = writer.as_mut() {
            write_frame(writer, &frame)?;
        }
        if (n + 1) % BLOCK_SIZE == 0 {
            if let Some(tx) = progress {
                let _ = tx.send(n + 1);
            }
        }
    }

    if let Some(writer) = writer {
        writer.finalize()?;
    }
    if let Some(tx) = progress {
        let _ = tx.send(frames);
    }

    Ok(report.finish(patch))
}

/// Render on a worker thread. The receiver yields frame counts as the render
/// advances and closes when it ends.
pub fn spawn_render(
    mut patch: Patch,
    frames: u64,
    wav: Option<PathBuf>,
) -> (thread::JoinHandle<Result<RenderReport>>, Receiver<u64>) {
    let (tx, rx) = channel::unbounded();
    let handle = thread::spawn(move || {
        info!("Render thread started for {} frames", frames);
        let result = render(&mut patch, frames, wav.as_ref(), Some(&tx));
        if let Err(e) = &result {
            warn!("Render failed: {}", e);
        }
        result
    });
    (handle, rx)
}

/// Wait for a spawned render, turning a panic into an error.
pub fn join_render(handle: thread::JoinHandle<Result<RenderReport>>) -> Result<RenderReport> {
    handle
        .join()
        .map_err(|_| Error::Render("render thread panicked".to_string()))?
}
