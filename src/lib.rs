pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod module;
pub mod patch;
pub mod port;
pub mod render;
pub mod state;
pub mod stochastic;
pub mod transport;
pub mod trigger;
pub mod ui;

pub use cli::Args;
pub use clock::ClockEngine;
pub use crate::config::PatchConfig;
pub use error::{Error, Result};
pub use module::{Module, ProcessArgs};
pub use patch::{Frame, Patch};
pub use state::{SharedTransport, TransportState};
pub use stochastic::{Mode, StochasticEngine};
pub use transport::TransportBroadcaster;

/// Fresh transport state to hand to broadcasters and clocks.
pub fn create_shared_transport() -> SharedTransport {
    TransportState::shared()
}
