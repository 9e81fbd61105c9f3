//! Surface simulation core for the Homeworld scene.
//!
//! Engine-agnostic: the rotation state machine, the polar projection that
//! places every surface entity, the day/night sky model, proximity-driven
//! interaction, and the notification feed all live here. The Bevy client only
//! feeds input in and draws what [`simulation::Simulation`] reports.

pub mod angle;
pub mod config;
pub mod error;
pub mod interaction;
pub mod lighting;
pub mod notifications;
pub mod persistence;
pub mod projection;
pub mod rotation;
pub mod simulation;
pub mod sun_times;
pub mod time_source;
pub mod timer;

pub use config::WorldConfig;
pub use error::{ConfigError, SunTimesError};
pub use simulation::{FrameInput, FrameReport, Simulation};
