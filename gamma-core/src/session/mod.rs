//! Conversation sessions
//!
//! A session is one conversation thread of append-only messages. The
//! manager owns the session list and drives a response generator.

pub mod generator;
pub mod manager;
pub mod store;

pub use generator::ResponseGenerator;
pub use manager::SessionManager;
pub use store::{ChatSession, Message};
