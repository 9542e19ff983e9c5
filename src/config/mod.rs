//! Configuration Module
//!
//! Startup configuration: listener, upstream, and the API key pool.

pub mod gateway;
pub mod loader;

pub use gateway::GatewayConfig;
pub use loader::ConfigLoader;
