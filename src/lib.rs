pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod notify;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TeamsFile;
pub use core::{conflicts::find_schedule_conflicts, dispatch::VenueDirectory, engine::AlertEngine};
pub use notify::{render_message, LogTransport, WebhookTransport};
pub use utils::error::{AlertError, Result};
