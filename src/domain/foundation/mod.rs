//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the access token value object, the state machine
//! trait and error types that form the vocabulary of the bot.

mod credential;
mod errors;
mod ids;
mod state_machine;

pub use credential::AccessToken;
pub use errors::ValidationError;
pub use ids::{has_thread_id_length, ChannelId, RequestId, ThreadId, UserId, THREAD_ID_LENGTHS};
pub use state_machine::StateMachine;
