use simplelog::*;
use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind};
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

fn log_dir() -> Result<PathBuf, Error> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not set"))?;

    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("chronowave")
        .join("logs"))
}

/// Log to `~/.local/share/chronowave/logs/app.log`, and to the terminal at
/// warn level unless `quiet`. Only the first call installs a logger.
pub fn init_logger(quiet: bool) -> Result<(), Error> {
    let log_dir = log_dir()?;
    fs::create_dir_all(&log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("app.log"))?;

    let mut result = Ok(());
    INIT.call_once(|| {
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            log_file,
        )];
        if !quiet {
            loggers.push(TermLogger::new(
                LevelFilter::Warn,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ));
        }

        if let Err(e) = CombinedLogger::init(loggers) {
            result = Err(Error::new(ErrorKind::Other, e.to_string()));
        }
    });
    result
}
