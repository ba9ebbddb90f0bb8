//! Scenario engine for the CrisisSim server.
//!
//! This crate implements everything behind the tool surface:
//!
//! - [`template`] - deterministic fallback narratives
//! - [`provider`] - adapter for the external text-generation capability
//! - [`store`] - in-memory session store with age-based eviction
//! - [`service`] - orchestration of prompt building, generation, and storage
//!
//! # Fallback policy
//!
//! Every generation makes at most one provider attempt. Any provider
//! failure, or the absence of provider credentials, substitutes the
//! deterministic template so the engine always has an answer.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod provider;
pub mod service;
pub mod store;
pub mod template;

pub use provider::{GenerationProvider, OpenAiProvider, ProviderError};
pub use service::{AdvancedScenario, CreatedScenario, NarrativeSource, ScenarioService};
pub use store::{Session, SessionStore};
