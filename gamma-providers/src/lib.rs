//! Completion provider integrations for gamma
//!
//! The gateway talks to the upstream completions API through
//! [`CompletionProvider`]; clients talk to the gateway through
//! [`RemoteGenerator`].

pub mod base;
pub mod groq;
pub mod remote;

pub use base::{ChatRole, ChatTurn, CompletionProvider, ProviderError, ProviderResult};
pub use groq::GroqClient;
pub use remote::RemoteGenerator;
