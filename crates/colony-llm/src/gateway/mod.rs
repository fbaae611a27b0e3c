//! Gateway - AI gateway provider
//!
//! Posts chat messages to `{base_url}/{account}/{gateway}/workers-ai/run/{model}`
//! and resolves the gateway's heterogeneous response bodies into text.

pub mod client;
pub mod config;
pub mod shape;
pub mod types;


pub use client::GatewayClient;
pub use config::{GatewayConfig, DEFAULT_AUTH_HEADER, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use shape::{ResponseShape, BLANK_RESPONSE_PLACEHOLDER};
