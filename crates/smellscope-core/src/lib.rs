//! Core types, configuration, and error handling for smellscope.
//!
//! This crate provides the shared foundation used by the other smellscope
//! crates:
//! - [`SmellscopeError`] — unified error type using `thiserror`
//! - [`SmellscopeConfig`] — configuration loaded from `.smellscope.toml`
//! - Shared types: [`LineRange`], [`Finding`], [`Issue`], [`ContextPolicy`],
//!   [`ScopeHint`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{ContextConfig, DiffConfig, SmellscopeConfig};
pub use error::SmellscopeError;
pub use types::{ContextPolicy, Finding, Issue, LineRange, OutputFormat, ScopeHint};

/// A convenience `Result` type for smellscope operations.
pub type Result<T> = std::result::Result<T, SmellscopeError>;
