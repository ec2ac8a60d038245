//! Message and MessageHandler
pub mod encoder;

pub mod types;
pub use types::*;

pub mod handlers;
pub use handlers::HandleMsg;
