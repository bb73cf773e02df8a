pub mod message;
pub mod transport;

pub use message::render_message;
pub use transport::{LogTransport, WebhookTransport};
