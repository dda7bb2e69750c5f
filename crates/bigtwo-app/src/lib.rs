pub mod cli;
pub mod config;
pub mod controller;
pub mod event;
pub mod logging;
pub mod session;
pub mod sim;

pub use config::EngineConfig;
pub use controller::{EnginePhase, GameController, InvalidDeal, InvalidPlay};
pub use event::{EventBus, GameEvent, Rejection};
pub use session::{RelayForwarder, RemoteCommand, SharedController};
pub use sim::Simulator;
