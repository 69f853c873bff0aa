// ui.rs

use crate::clock::{multiplier, CHANNELS};
use crate::config::PatchConfig;
use crate::render::RenderReport;
use crossbeam::channel::Receiver;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub fn create_render_progress(total_frames: u64) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(total_frames), ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:40.cyan}] {pos}/{len} frames ({eta})")
            .unwrap()
            .progress_chars("⣀⣤⣦⣶⣷⣿ "),
    );
    pb.set_prefix("Render");
    pb
}

/// Drive `pb` from a render's progress channel until the render closes it.
pub fn follow_progress(pb: &ProgressBar, progress: Receiver<u64>) {
    for frames in progress {
        pb.set_position(frames);
    }
    pb.finish_and_clear();
}

/// Human-readable summary of a finished render.
pub fn format_report(patch: &PatchConfig, report: &RenderReport) -> String {
    let mut out = format!(
        "Rendered {} frames ({:.2}s at {} Hz)\n",
        report.frames,
        report.seconds(),
        report.sample_rate
    );

    for channel in 0..CHANNELS {
        let rate = patch
            .clock
            .channels
            .get(channel)
            .map(|c| c.rate)
            .unwrap_or(7);
        out.push_str(&format!(
            "  sub {}: x{:<9} {:>6} pulses, duty {:.1}%\n",
            channel + 1,
            format_multiplier(multiplier(rate)),
            report.rising_edges[channel],
            report.duty(channel) * 100.0
        ));
    }

    out.push_str(&format!(
        "  random: {} targets, min {:.3}V, max {:.3}V, mean {:.3}V\n",
        report.resamples, report.cv_min, report.cv_max, report.cv_mean
    ));
    out
}

fn format_multiplier(m: f32) -> String {
    if m >= 1.0 {
        format!("{}", m)
    } else {
        format!("1/{}", (1.0 / m).round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_progress_creation() {
        let pb = create_render_progress(1000);
        assert_eq!(pb.length(), Some(1000));
        assert_eq!(pb.position(), 0);
    }

    #[test]
    fn test_multiplier_labels() {
        assert_eq!(format_multiplier(1.0 / 128.0), "1/128");
        assert_eq!(format_multiplier(3.0), "3");
    }
}
