//! Colony LLM - Text-generation gateway client
//!
//! This crate provides the generation side of the Colony agent hub:
//! - Generator: the trait every text-generation backend implements
//! - Gateway: HTTP client for the AI gateway and its response-shape resolution
//! - Message: conversation message types
//! - Profile: per-call model/persona settings
//! - Mock: scripted generator for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod gateway;
pub mod generator;
pub mod message;
pub mod mock;
pub mod profile;
pub mod util;

pub use error::{GenerationError, Result};
pub use gateway::{GatewayClient, GatewayConfig, ResponseShape, BLANK_RESPONSE_PLACEHOLDER};
pub use generator::{complete_in_band, GenerationRequest, Generator};
pub use message::{Message, MessageRole};
pub use mock::MockGenerator;
pub use profile::{GenerationProfile, DEFAULT_MODEL, GENERIC_INSTRUCTION};
