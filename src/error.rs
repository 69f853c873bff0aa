use std::error::Error as StdError;
use std::fmt;

/// Errors raised outside the per-sample path: loading a patch, setting up
/// logging, writing rendered output.
#[derive(Debug)]
pub enum Error {
    /// The patch description could not be read or has invalid values
    Config(String),
    /// Filesystem error while logging or writing output
    Io(std::io::Error),
    /// The WAV writer rejected a sample or could not be finalized
    Wav(String),
    /// The render thread stopped before finishing
    Render(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Patch configuration error: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Wav(msg) => write!(f, "WAV output error: {}", msg),
            Error::Render(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Error::Wav(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
