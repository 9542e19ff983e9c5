//! Router Module
//!
//! Handles model alias resolution and API key pool management.

pub mod aliases;
pub mod key_pool;

pub use aliases::AliasRegistry;
pub use key_pool::{ApiKey, KeyPool};
