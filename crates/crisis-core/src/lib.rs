//! Core types for the CrisisSim crisis-simulation server.
//!
//! This crate provides the foundational pieces shared by the engine and
//! server crates:
//! - Error hierarchy with contextual information
//! - Runtime configuration sourced from the environment

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;

pub use config::{ProviderConfig, ServerConfig};
pub use error::{Error, Result};
