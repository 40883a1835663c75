//! Core types and traits for gamma
//!
//! This crate provides the foundational types, configuration and session
//! management used by all other gamma components.

pub mod config;
pub mod error;
pub mod limits;
pub mod logging;
pub mod session;

pub use error::{Error, Result};
