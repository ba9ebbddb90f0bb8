//! MCP service implementation for crisis simulation.
//!
//! The `CrisisSimService` exposes two tools:
//! 1. `generateScenario` - create a new crisis scenario with roles and actions
//! 2. `nextStep` - advance the scenario based on a decision
//!
//! Response text is a fixed contract:
//! - generate: `Session ID: {id}\n\nScenario:\n{text}`
//! - advance: `Updated Scenario (Step {n}):\n{text}`
//! - unknown session: `Error: Session ID {id} not found. Please generate a
//!   new scenario first.`

use crate::types::{GenerateScenarioParams, NextStepParams};
use crisis_sim_core::{Error, ServerConfig};
use crisis_sim_engine::{OpenAiProvider, ScenarioService, SessionStore};
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, tool, tool_handler, tool_router};
use std::sync::Arc;
use uuid::Uuid;

/// MCP server for crisis-simulation training.
///
/// Thin dispatch shim over [`ScenarioService`]: it decodes tool
/// parameters, delegates, and formats the reply text. Generation policy
/// (provider attempt, template fallback) lives entirely in the engine.
#[derive(Debug, Clone)]
pub struct CrisisSimService {
    /// Scenario engine holding the session store and provider
    engine: ScenarioService,

    /// Tool router for MCP protocol
    tool_router: ToolRouter<Self>,
}

impl CrisisSimService {
    /// Creates a service around an existing engine.
    #[must_use]
    pub fn new(engine: ScenarioService) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    /// Wires a service from configuration.
    ///
    /// Builds the provider only when an API key is configured; otherwise
    /// the engine runs in permanent template-fallback mode.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let provider = OpenAiProvider::from_config(&config.provider)
            .map(|p| Arc::new(p) as Arc<dyn crisis_sim_engine::GenerationProvider>);

        let engine = ScenarioService::new(
            Arc::new(SessionStore::new()),
            provider,
            config.provider.max_output_tokens,
        );

        Self::new(engine)
    }

    /// The session store, shared with the eviction sweep task.
    #[must_use]
    pub fn store(&self) -> Arc<SessionStore> {
        Arc::clone(self.engine.store())
    }
}

#[tool_router]
impl CrisisSimService {
    /// Generate a new crisis scenario.
    ///
    /// Creates a session, generates (or templates) the initial narrative,
    /// and returns the session identifier with the scenario text.
    #[tool(
        name = "generateScenario",
        description = "Generate a new crisis scenario with roles and initial actions"
    )]
    async fn generate_scenario(
        &self,
        Parameters(params): Parameters<GenerateScenarioParams>,
    ) -> Result<CallToolResult, McpError> {
        let created = self
            .engine
            .generate_scenario(&params.crisis_type, &params.location, params.people_count)
            .await
            .map_err(map_engine_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Session ID: {}\n\nScenario:\n{}",
            created.session_id, created.scenario
        ))]))
    }

    /// Advance the crisis scenario based on a decision.
    ///
    /// An unknown, expired, or unparseable session identifier yields the
    /// fixed not-found text as ordinary tool output, never a failure.
    #[tool(
        name = "nextStep",
        description = "Get the next step in the crisis scenario based on a decision"
    )]
    async fn next_step(
        &self,
        Parameters(params): Parameters<NextStepParams>,
    ) -> Result<CallToolResult, McpError> {
        let Ok(session_id) = Uuid::parse_str(&params.session_id) else {
            return Ok(session_not_found(&params.session_id));
        };

        match self.engine.advance_scenario(session_id, &params.decision).await {
            Ok(advanced) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Updated Scenario (Step {}):\n{}",
                advanced.step, advanced.scenario
            ))])),
            Err(Error::SessionNotFound { .. }) => Ok(session_not_found(&params.session_id)),
            Err(err) => Err(map_engine_error(err)),
        }
    }
}

#[tool_handler]
impl ServerHandler for CrisisSimService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Run crisis-simulation training exercises. Use generateScenario \
                 to start a scenario, then nextStep with the returned session ID \
                 to play out decisions."
                    .to_string(),
            ),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Fixed reply for an unknown or expired session.
fn session_not_found(session_id: &str) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!(
        "Error: Session ID {session_id} not found. Please generate a new scenario first."
    ))])
}

/// Maps engine errors onto MCP protocol errors.
///
/// Session-not-found is handled by the caller before this point; provider
/// errors never escape the engine.
fn map_engine_error(err: Error) -> McpError {
    match err {
        Error::InvalidInput { message } => McpError::invalid_params(message, None),
        other => McpError::internal_error(other.to_string(), None),
    }
}
