//! Q&A orchestration: context precedence and the conversation log.

pub mod context;
pub mod conversation;

pub use context::{ContextSelector, ResolvedContext, TurnSource};
pub use conversation::{ConversationLog, ConversationTurn};
