mod activities;
mod core;
mod hud;
mod input;
mod planet;
mod sky;
mod sun_fetch;

pub use activities::ActivitiesPlugin;
pub use core::{Clock, CorePlugin, Persistence, SimState};
pub(crate) use core::{ActivityStarted, LastFrame, MainCamera, UpdateSet};
#[cfg(test)]
pub(crate) use core::make_test_app;
pub use hud::HudPlugin;
pub use input::InputPlugin;
pub use planet::PlanetPlugin;
pub use sky::SkyPlugin;
pub use sun_fetch::SunFetchPlugin;
