//! MCP server for crisis-simulation training.
//!
//! This crate is the tool dispatch shim over the scenario engine. It
//! exposes two tools:
//!
//! 1. **`generateScenario`** - create a crisis scenario with assigned
//!    roles and recommended first actions
//! 2. **`nextStep`** - advance the scenario based on a user decision
//!
//! # Workflow
//!
//! 1. The client calls `generateScenario` with a crisis type, location,
//!    and affected-people count and receives a session ID plus narrative
//! 2. The client calls `nextStep` with that session ID and a decision,
//!    repeatedly, to play out the exercise
//! 3. Sessions are evicted after 24 hours by a background sweep
//!
//! # Examples
//!
//! ```no_run
//! use crisis_sim_core::ServerConfig;
//! use crisis_sim_server::CrisisSimService;
//! use rmcp::ServiceExt;
//! use rmcp::transport::stdio;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = CrisisSimService::from_config(&ServerConfig::from_env())
//!     .serve(stdio())
//!     .await?;
//! service.waiting().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod service;
pub mod types;

pub use service::CrisisSimService;
pub use types::{GenerateScenarioParams, NextStepParams};
