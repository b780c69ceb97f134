// #![deny(missing_docs)]

/// Oral Messages OM(f) round engine
pub mod simulation;

/// Recursive majority resolution over a general's message log
pub mod decision;

pub mod actor;
pub mod config;
pub mod fault;
pub mod logging;
pub mod majority;
pub mod message_log;
pub mod msc;
pub mod path;
pub mod snapshot;
pub mod value;

pub use actor::{Id, Participant};
pub use config::{ConfigError, SimConfig};
pub use fault::{FaultInjector, Inverter, ParityLiar};
pub use majority::majority;
pub use path::{InvalidPath, Path};
pub use simulation::{Message, Phase, PhaseError, RoundReport, Simulation, ToggleError};
pub use snapshot::{ParticipantView, SimulationView};
pub use value::Value;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Toggle(#[from] ToggleError),
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error("Failed to encode with bincode")]
    Encoding(#[from] bincode::Error),
    #[error("Failed to write output")]
    Io(#[from] std::io::Error),
}
