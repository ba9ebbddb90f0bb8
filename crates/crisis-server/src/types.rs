//! Parameter types for the CrisisSim tools.
//!
//! These types define the declared input schemas for the two tools:
//! - `generateScenario`: create a new crisis scenario
//! - `nextStep`: advance a scenario based on a decision

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for generating a new crisis scenario.
///
/// # Examples
///
/// ```
/// use crisis_sim_server::types::GenerateScenarioParams;
///
/// let params = GenerateScenarioParams {
///     crisis_type: "earthquake".to_string(),
///     location: "San Francisco".to_string(),
///     people_count: 5000,
/// };
/// ```
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateScenarioParams {
    /// Type of crisis (e.g., natural disaster, terrorist attack, pandemic, etc.)
    pub crisis_type: String,

    /// Location where the crisis occurs
    pub location: String,

    /// Number of people affected by the crisis
    pub people_count: u32,
}

/// Parameters for advancing a crisis scenario.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NextStepParams {
    /// Session ID from the previous scenario
    pub session_id: String,

    /// The decision made by the user
    pub decision: String,
}
