pub mod actions;
pub mod callbacks;
pub mod commands;
pub mod dispatcher;
pub mod messages;
pub mod reply;
pub mod utils;

use std::error::Error;

pub use callbacks::callback_handler;
pub use commands::command_handler;
pub use dispatcher::EventDispatcher;
pub use messages::message_handler;

pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;
