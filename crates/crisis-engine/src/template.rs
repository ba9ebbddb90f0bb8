//! Deterministic fallback narratives.
//!
//! These pure functions produce the template text used whenever the
//! text-generation provider is unavailable or fails. Identical inputs
//! always produce byte-identical output, so the engine can guarantee an
//! answer without any external dependency.

/// Renders the initial scenario narrative for a new session.
///
/// Embeds the three inputs verbatim, followed by exactly three assigned
/// responder roles and three recommended first actions. Never fails.
///
/// # Examples
///
/// ```
/// use crisis_sim_engine::template;
///
/// let text = template::initial_scenario("earthquake", "San Francisco", 5000);
/// assert!(text.contains("earthquake"));
/// assert!(text.contains("San Francisco"));
/// assert!(text.contains("5000"));
/// assert!(text.contains("Incident Commander"));
/// ```
#[must_use]
pub fn initial_scenario(crisis_type: &str, location: &str, people_count: u32) -> String {
    format!(
        "A {crisis_type} has occurred in {location}, affecting approximately {people_count} people. \
         The situation requires immediate emergency response coordination and has overwhelmed local resources.\n\
         \n\
         Assigned Roles:\n\
         1. Incident Commander - Coordinate overall emergency response and resource allocation across all affected areas\n\
         2. Medical Team Lead - Oversee triage, medical treatment, and casualty management for {people_count} affected individuals\n\
         3. Communications Officer - Manage public information, media relations, and inter-agency communication during the crisis\n\
         \n\
         Recommended Actions:\n\
         1. Establish emergency command center and activate incident command system to coordinate response efforts\n\
         2. Deploy emergency response teams to the affected area and set up triage stations\n\
         3. Set up emergency shelters and medical triage centers to accommodate displaced residents"
    )
}

/// Renders the follow-up narrative after a decision.
///
/// Embeds the decision verbatim, a status block, and three updated
/// recommended actions. Never fails.
///
/// # Examples
///
/// ```
/// use crisis_sim_engine::template;
///
/// let text = template::next_step("deploy search and rescue teams");
/// assert!(text.contains("deploy search and rescue teams"));
/// assert!(text.contains("Current Status:"));
/// ```
#[must_use]
pub fn next_step(decision: &str) -> String {
    format!(
        "Based on the decision to {decision}, the situation has evolved significantly. \
         The emergency response has been implemented with both positive outcomes and new challenges that require immediate attention.\n\
         \n\
         Current Status: The decision has been executed, but new complications have arisen including resource shortages, \
         communication breakdowns, and coordination challenges between multiple agencies. \
         Approximately 60% of the affected population has been reached, but 40% still require assistance.\n\
         \n\
         Updated Recommended Actions:\n\
         1. Assess the effectiveness of the implemented decision and identify gaps in the response\n\
         2. Address new challenges that have emerged and coordinate with additional emergency services\n\
         3. Establish backup communication systems and resource distribution networks"
    )
}
