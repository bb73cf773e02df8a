pub mod conflicts;
pub mod dispatch;
pub mod engine;
pub mod fetch;
pub mod fields;
pub mod schedule;
pub mod xpath;

pub use crate::domain::model::{Match, TeamConfig};
pub use crate::domain::ports::MailTransport;
pub use crate::utils::error::Result;
