pub mod conversation;
pub mod session;

pub use conversation::{ConversationState, CredentialsStep, Field};
pub use session::UserSession;
