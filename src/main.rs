use chronowave::{
    logging,
    render::{join_render, spawn_render},
    ui::{create_render_progress, follow_progress, format_report},
    Args, Patch, PatchConfig, Result,
};
use clap::Parser;

fn main() {
    let args = Args::parse();
    initialize_logging(args.quiet);

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn initialize_logging(quiet: bool) {
    if let Err(e) = logging::init_logger(quiet) {
        eprintln!("Logger initialization failed: {}", e);
    }
    log::info!(
        "chronowave starting at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
}

fn load_patch(args: &Args) -> Result<PatchConfig> {
    let mut patch = PatchConfig::load(args.patch.as_deref())?;
    args.apply(&mut patch);
    patch.validate()?;
    Ok(patch)
}

fn run(args: &Args) -> Result<()> {
    let config = load_patch(args)?;
    let frames = config.total_frames();
    let patch = Patch::from_config(&config);

    let (handle, progress) = spawn_render(patch, frames, args.wav.clone());
    if args.quiet {
        drop(progress);
    } else {
        let pb = create_render_progress(frames);
        follow_progress(&pb, progress);
    }

    let report = join_render(handle)?;
    log::info!("Render finished: {:?}", report);
    print!("{}", format_report(&config, &report));
    if let Some(path) = &args.wav {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
