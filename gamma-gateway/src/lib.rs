//! Chat gateway service for gamma
//!
//! Exposes the chat endpoint, keeps the per-session rolling conversation
//! context and forwards completions to the upstream provider.

pub mod error;
pub mod handlers;
pub mod history;
pub mod origin;
pub mod quota;
pub mod server;
pub mod state;

pub use server::{build_router, run_server};
pub use state::AppState;
