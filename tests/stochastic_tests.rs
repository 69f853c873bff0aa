use chronowave::stochastic::{Mode, SequenceEntropy, StochasticEngine};
use chronowave::{Module, ProcessArgs};

fn args() -> ProcessArgs {
    ProcessArgs::new(48_000.0)
}

fn engine() -> StochasticEngine {
    StochasticEngine::with_entropy(Box::new(SequenceEntropy::new(vec![1234, 98_765])))
}

/// Engine with its clock patched and held low.
fn clocked_engine() -> StochasticEngine {
    let mut engine = engine();
    engine.inputs.clock.set_voltage(0.0);
    engine.process(&args());
    engine
}

/// One full clock pulse; returns the target drawn on its rising edge.
fn pulse(engine: &mut StochasticEngine) -> f32 {
    engine.inputs.clock.set_voltage(10.0);
    engine.process(&args());
    engine.inputs.clock.set_voltage(0.0);
    engine.process(&args());
    engine.target()
}

fn targets(engine: &mut StochasticEngine, count: usize) -> Vec<f32> {
    (0..count).map(|_| pulse(engine)).collect()
}

#[derive(Clone, Copy)]
enum Trigger {
    Reseed,
    GenerateSeed,
}

/// Send one pulse into a reseed or generate-seed input.
fn trigger(engine: &mut StochasticEngine, which: Trigger) {
    for voltage in [0.0, 10.0, 0.0] {
        match which {
            Trigger::Reseed => engine.inputs.reseed.set_voltage(voltage),
            Trigger::GenerateSeed => engine.inputs.generate_seed.set_voltage(voltage),
        }
        engine.process(&args());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_seed_is_deterministic_for_every_mode() {
        for mode in Mode::ALL {
            let mut a = clocked_engine();
            let mut b = clocked_engine();
            for engine in [&mut a, &mut b] {
                engine.set_mode(mode);
                engine.reseed(77);
            }
            let first = targets(&mut a, 32);
            let second = targets(&mut b, 32);
            assert_eq!(first, second, "mode {} diverged", mode);
            assert!(first.iter().all(|t| (0.0..=10.0).contains(t)));
        }
    }

    #[test]
    fn test_reseed_trigger_reproduces_sequence() {
        let mut engine = clocked_engine();
        engine.set_seed(42);

        trigger(&mut engine, Trigger::Reseed);
        let first = targets(&mut engine, 16);

        trigger(&mut engine, Trigger::Reseed);
        let second = targets(&mut engine, 16);
        assert_eq!(first, second);

        let mut other = clocked_engine();
        other.reseed(43);
        assert_ne!(first, targets(&mut other, 16));
    }

    #[test]
    fn test_seed_cv_scales_reseed() {
        let mut scaled = clocked_engine();
        scaled.set_seed(100);
        scaled.inputs.seed.set_voltage(5.0);
        trigger(&mut scaled, Trigger::Reseed);

        let mut direct = clocked_engine();
        direct.reseed(50);

        assert_eq!(targets(&mut scaled, 8), targets(&mut direct, 8));
    }

    #[test]
    fn test_generate_seed_stores_entropy_value() {
        let mut engine = clocked_engine();
        trigger(&mut engine, Trigger::GenerateSeed);
        assert_eq!(engine.seed(), 1234);
        trigger(&mut engine, Trigger::GenerateSeed);
        assert_eq!(engine.seed(), 98_765);
    }

    #[test]
    fn test_generated_seed_reproduces_after_reseed() {
        let mut engine =
            StochasticEngine::with_entropy(Box::new(SequenceEntropy::new(vec![555])));
        engine.inputs.clock.set_voltage(0.0);
        engine.process(&args());

        trigger(&mut engine, Trigger::GenerateSeed);
        assert_eq!(engine.seed(), 555);

        trigger(&mut engine, Trigger::Reseed);
        let first = targets(&mut engine, 4);
        trigger(&mut engine, Trigger::Reseed);
        let second = targets(&mut engine, 4);
        assert_eq!(first, second);

        let mut direct = clocked_engine();
        direct.reseed(555);
        assert_eq!(first, targets(&mut direct, 4));
    }

    #[test]
    fn test_seed_triggers_inert_without_clock() {
        let mut engine = engine();
        trigger(&mut engine, Trigger::GenerateSeed);
        assert_eq!(engine.seed(), 0);
    }

    #[test]
    fn test_mode_button_cycles_back() {
        let mut engine = engine();
        engine.set_mode(Mode::Linear);
        let start = engine.mode();

        let mut seen = Vec::new();
        for _ in 0..5 {
            engine.params.mode_button.set_value(1.0);
            engine.process(&args());
            engine.process(&args());
            engine.params.mode_button.set_value(0.0);
            engine.process(&args());
            seen.push(engine.mode());
        }

        assert_eq!(engine.mode(), start);
        assert_eq!(
            seen,
            vec![
                Mode::Triangle,
                Mode::InverseTriangle,
                Mode::Uniform,
                Mode::InverseLinear,
                Mode::Linear
            ]
        );
    }

    #[test]
    fn test_mode_cv_overrides_button() {
        let mut engine = engine();
        engine.inputs.mode.set_voltage(4.2);
        engine.params.mode_button.set_value(1.0);
        engine.process(&args());
        assert_eq!(engine.mode(), Mode::Linear);
        assert_eq!(engine.params.mode.value(), 2.0);
        assert_eq!(engine.mode_light.brightness(), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unclocked_output_holds() {
        let mut engine = clocked_engine();
        engine.params.slew.set_value(0.0);
        pulse(&mut engine);
        let held = engine.output.voltage();

        engine.inputs.clock.disconnect();
        engine.params.offset.set_value(10.0);
        for _ in 0..10_000 {
            engine.process(&args());
            assert_eq!(engine.output.voltage(), held);
        }

        let mut fresh = super::engine();
        for _ in 0..1000 {
            fresh.process(&args());
        }
        assert_eq!(fresh.output.voltage(), 0.0);
        assert_eq!(fresh.samples_drawn(), 0);
    }

    #[test]
    fn test_small_slew_snaps_to_target() {
        let mut engine = clocked_engine();
        engine.params.slew.set_value(5.0);
        engine.inputs.clock.set_voltage(10.0);
        engine.process(&args());
        assert!(engine.target() > 0.0);
        assert_eq!(engine.current(), engine.target());
        assert_eq!(engine.output.voltage(), engine.target());
    }

    #[test]
    fn test_slew_never_overshoots() {
        let mut engine = clocked_engine();
        engine.params.slew.set_value(100.0);
        engine.params.offset.set_value(4.0);
        engine.reseed(9);

        for _ in 0..20 {
            engine.inputs.clock.set_voltage(10.0);
            for step in 0..3000 {
                let before = engine.current();
                engine.process(&args());
                if step == 0 {
                    engine.inputs.clock.set_voltage(0.0);
                }
                let after = engine.current();
                let target = engine.target();
                let (lo, hi) = if before <= target {
                    (before, target)
                } else {
                    (target, before)
                };
                assert!(after >= lo && after <= hi, "{} not within [{}, {}]", after, lo, hi);
                assert!((0.0..=10.0).contains(&after));
                assert!((after - before).abs() <= 0.01 + 1e-6);
            }
        }
    }

    #[test]
    fn test_tenx_slows_the_slew() {
        let mut engine = clocked_engine();
        engine.params.slew.set_value(100.0);
        engine.params.offset.set_value(5.0);
        engine.params.tenx.set_value(1.0);

        engine.inputs.clock.set_voltage(10.0);
        engine.process(&args());
        assert!(engine.is_tenx());
        assert!((engine.current() - 0.001).abs() < 1e-6);
        assert_eq!(engine.tenx_light.brightness(), [0.0, 1.0, 1.0]);

        engine.inputs.tenx.set_voltage(0.0);
        engine.process(&args());
        assert!(!engine.is_tenx());
        assert!((engine.current() - 0.011).abs() < 1e-5);
        assert!(!engine.tenx_light.is_lit());
    }

    #[test]
    fn test_scale_and_offset_cv() {
        let mut engine = clocked_engine();
        engine.params.scale.set_value(10.0);
        engine.inputs.scale.set_voltage(0.0);
        engine.params.offset.set_value(6.0);
        engine.inputs.offset.set_voltage(5.0);
        pulse(&mut engine);
        assert!((engine.target() - 3.0).abs() < 1e-6);
        assert!((engine.output.voltage() - 3.0).abs() < 1e-6);
    }
}
