//! Client Module
//!
//! HTTP client for the upstream completion API.

pub mod http;

pub use http::HttpClient;
