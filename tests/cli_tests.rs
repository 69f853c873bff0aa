#[cfg(test)]
mod tests {
    use chronowave::config::PatchConfig;
    use chronowave::*;
    use clap::Parser;
    use std::fs;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["chronowave"]);
        assert_eq!(args.patch, None);
        assert_eq!(args.bpm, None);
        assert!(!args.no_sync);
        assert!(!args.quiet);
    }

    #[test]
    fn test_overrides_apply_on_top_of_patch() {
        let args = Args::parse_from([
            "chronowave",
            "--bpm",
            "140",
            "--no-sync",
            "--seed",
            "7",
            "-m",
            "3",
            "--seconds",
            "1.5",
            "--sample-rate",
            "48000",
        ]);
        let mut patch = PatchConfig::default();
        args.apply(&mut patch);

        assert_eq!(patch.transport.bpm, 140.0);
        assert_eq!(patch.clock.bpm, 140.0);
        assert!(!patch.transport.enabled);
        assert_eq!(patch.random.seed, 7);
        assert_eq!(patch.random.mode, 3);
        assert_eq!(patch.render.seconds, 1.5);
        assert_eq!(patch.render.sample_rate, 48_000.0);
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args::parse_from(["chronowave", "--mode", "9"]);
        let mut patch = PatchConfig::default();
        args.apply(&mut patch);
        assert!(matches!(patch.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let patch = PatchConfig::load(None).unwrap();
        assert_eq!(patch.render, PatchConfig::default().render);
        assert_eq!(patch.clock.channels.len(), 3);
    }

    #[test]
    fn test_load_patch_file() {
        let path = std::env::temp_dir().join(format!("chronowave-patch-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[transport]\nbpm = 90\n\n[random]\nmode = 2\nslew = 500\n\n[[clock.channels]]\nrate = 14\noffset = 0.25\n",
        )
        .unwrap();

        let patch = PatchConfig::load(Some(path.as_path())).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(patch.transport.bpm, 90.0);
        assert!(patch.transport.enabled);
        assert_eq!(patch.random.mode, 2);
        assert_eq!(patch.random.slew, 500.0);
        assert_eq!(patch.clock.channels.len(), 1);
        assert_eq!(patch.clock.channels[0].rate, 14);
    }

    #[test]
    fn test_bad_file_values_fail_validation() {
        let path = std::env::temp_dir().join(format!("chronowave-bad-{}.toml", std::process::id()));
        fs::write(&path, "[clock]\nbpm = 2000\n").unwrap();

        let patch = PatchConfig::load(Some(path.as_path())).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(matches!(patch.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_override_replaces_bad_file_value() {
        let path =
            std::env::temp_dir().join(format!("chronowave-override-{}.toml", std::process::id()));
        fs::write(&path, "[random]\nmode = 7\n").unwrap();

        let mut patch = PatchConfig::load(Some(path.as_path())).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(patch.random.mode, 7);

        let args = Args::parse_from(["chronowave", "--mode", "2"]);
        args.apply(&mut patch);
        assert_eq!(patch.random.mode, 2);
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_environment_layer_overrides_defaults() {
        std::env::set_var("CHRONOWAVE_RANDOM__SCALE", "4");
        let result = PatchConfig::load(None);
        std::env::remove_var("CHRONOWAVE_RANDOM__SCALE");

        let patch = result.unwrap();
        assert_eq!(patch.random.scale, 4.0);
        assert_eq!(patch.random.offset, 0.0);
    }
}
