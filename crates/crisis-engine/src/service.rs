//! Scenario orchestration.
//!
//! The [`ScenarioService`] implements the two observable operations:
//! create a crisis scenario and advance it given a decision. It builds
//! the generation prompts, makes at most one provider attempt per call,
//! falls back to the deterministic templates on any provider failure,
//! and keeps the session store current.

use crate::provider::GenerationProvider;
use crate::store::SessionStore;
use crate::template;
use crisis_sim_core::{Error, Result};
use std::sync::Arc;
use uuid::Uuid;

/// System instruction for initial scenario generation.
const SCENARIO_SYSTEM_INSTRUCTION: &str = "You are a crisis simulation expert. \
     Generate realistic, detailed crisis scenarios for training purposes.";

/// System instruction for advancing a scenario.
const NEXT_STEP_SYSTEM_INSTRUCTION: &str = "You are a crisis simulation expert. \
     Provide realistic consequences and next steps based on user decisions.";

/// Where a narrative came from.
///
/// Recorded for logging only; the wire format does not distinguish
/// model-generated from template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeSource {
    /// Text returned by the external provider.
    Provider,
    /// Deterministic template fallback.
    Template,
}

/// Result of creating a scenario.
#[derive(Debug, Clone)]
pub struct CreatedScenario {
    /// Identifier of the new session.
    pub session_id: Uuid,
    /// The initial narrative text.
    pub scenario: String,
    /// Origin of the narrative.
    pub source: NarrativeSource,
}

/// Result of advancing a scenario.
#[derive(Debug, Clone)]
pub struct AdvancedScenario {
    /// Step number after the advance.
    pub step: u32,
    /// The updated narrative text.
    pub scenario: String,
    /// Origin of the narrative.
    pub source: NarrativeSource,
}

/// Orchestrates prompt building, generation, fallback, and storage.
///
/// # Examples
///
/// ```
/// use crisis_sim_engine::{ScenarioService, SessionStore};
/// use std::sync::Arc;
///
/// # async fn example() {
/// // No provider configured: permanent template mode
/// let service = ScenarioService::new(Arc::new(SessionStore::new()), None, 500);
///
/// let created = service
///     .generate_scenario("earthquake", "San Francisco", 5000)
///     .await
///     .unwrap();
/// assert!(!created.scenario.is_empty());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioService {
    store: Arc<SessionStore>,
    provider: Option<Arc<dyn GenerationProvider>>,
    max_output_tokens: u32,
}

impl ScenarioService {
    /// Creates a new service.
    ///
    /// A `None` provider selects permanent template-fallback mode.
    #[must_use]
    pub fn new(
        store: Arc<SessionStore>,
        provider: Option<Arc<dyn GenerationProvider>>,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            store,
            provider,
            max_output_tokens,
        }
    }

    /// The session store backing this service.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Creates a new crisis scenario and session.
    ///
    /// Makes one provider attempt (if configured) and falls back to the
    /// deterministic template on failure. Exactly one new session record
    /// is created either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `crisis_type` or `location` is
    /// empty.
    pub async fn generate_scenario(
        &self,
        crisis_type: &str,
        location: &str,
        people_count: u32,
    ) -> Result<CreatedScenario> {
        if crisis_type.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "crisis_type must not be empty".to_string(),
            });
        }
        if location.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "location must not be empty".to_string(),
            });
        }

        tracing::info!(crisis_type, location, people_count, "generating scenario");

        let prompt = build_scenario_prompt(crisis_type, location, people_count);
        let (scenario, source) = self
            .generate_or_fallback(SCENARIO_SYSTEM_INSTRUCTION, &prompt, || {
                template::initial_scenario(crisis_type, location, people_count)
            })
            .await;

        let session_id = self
            .store
            .create(crisis_type, location, people_count, scenario.clone())
            .await;

        tracing::info!(%session_id, ?source, "scenario stored");

        Ok(CreatedScenario {
            session_id,
            scenario,
            source,
        })
    }

    /// Advances an existing scenario with a decision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `decision` is empty, or
    /// [`Error::SessionNotFound`] if the session does not exist.
    pub async fn advance_scenario(
        &self,
        session_id: Uuid,
        decision: &str,
    ) -> Result<AdvancedScenario> {
        if decision.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "decision must not be empty".to_string(),
            });
        }

        tracing::info!(%session_id, decision, "advancing scenario");

        let session = self.store.get(session_id).await?;

        let prompt = build_next_step_prompt(&session.scenario, decision);
        let (scenario, source) = self
            .generate_or_fallback(NEXT_STEP_SYSTEM_INSTRUCTION, &prompt, || {
                template::next_step(decision)
            })
            .await;

        let step = self.store.update(session_id, scenario.clone()).await?;

        tracing::info!(%session_id, step, ?source, "scenario advanced");

        Ok(AdvancedScenario {
            step,
            scenario,
            source,
        })
    }

    /// One provider attempt, then unconditional template substitution.
    ///
    /// The store lock is never held here; only local data is touched.
    async fn generate_or_fallback(
        &self,
        system_instruction: &str,
        prompt: &str,
        fallback: impl FnOnce() -> String,
    ) -> (String, NarrativeSource) {
        let Some(provider) = &self.provider else {
            tracing::debug!("no provider configured, using template generation");
            return (fallback(), NarrativeSource::Template);
        };

        match provider
            .generate(system_instruction, prompt, self.max_output_tokens)
            .await
        {
            Ok(text) => (text, NarrativeSource::Provider),
            Err(err) => {
                tracing::warn!(error = %err, "provider failed, using template generation");
                (fallback(), NarrativeSource::Template)
            }
        }
    }
}

/// Builds the prompt for a new scenario.
fn build_scenario_prompt(crisis_type: &str, location: &str, people_count: u32) -> String {
    format!(
        "Generate a realistic crisis scenario with the following details:\n\
         - Crisis Type: {crisis_type}\n\
         - Location: {location}\n\
         - People Affected: {people_count}\n\
         \n\
         Please provide a 4-6 sentence scenario that includes:\n\
         1. Brief situation description\n\
         2. 3 assigned roles for responders (e.g., Incident Commander, Medical Team Lead, Communications Officer)\n\
         3. First 3 recommended actions\n\
         \n\
         Make it realistic and engaging for crisis simulation training."
    )
}

/// Builds the prompt for advancing a scenario.
fn build_next_step_prompt(previous_scenario: &str, decision: &str) -> String {
    format!(
        "Previous Crisis Scenario:\n\
         {previous_scenario}\n\
         \n\
         User Decision: {decision}\n\
         \n\
         Based on this decision, provide an updated scenario that includes:\n\
         1. Realistic consequences of the decision\n\
         2. New challenges or complications that arise\n\
         3. Updated recommended actions for the next phase\n\
         4. Current status of the crisis\n\
         \n\
         Keep it realistic and maintain the same level of detail (4-6 sentences)."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use std::collections::HashSet;

    /// Provider that always returns the same text.
    #[derive(Debug)]
    struct CannedProvider(&'static str);

    #[async_trait]
    impl GenerationProvider for CannedProvider {
        async fn generate(
            &self,
            _system_instruction: &str,
            _user_prompt: &str,
            _max_output_tokens: u32,
        ) -> std::result::Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    /// Provider that always fails.
    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl GenerationProvider for FailingProvider {
        async fn generate(
            &self,
            _system_instruction: &str,
            _user_prompt: &str,
            _max_output_tokens: u32,
        ) -> std::result::Result<String, ProviderError> {
            Err(ProviderError::MalformedResponse {
                message: "quota exceeded".to_string(),
            })
        }
    }

    fn template_only_service() -> ScenarioService {
        ScenarioService::new(Arc::new(SessionStore::new()), None, 500)
    }

    #[tokio::test]
    async fn test_generate_without_provider_uses_template() {
        let service = template_only_service();

        let created = service
            .generate_scenario("earthquake", "San Francisco", 5000)
            .await
            .unwrap();

        assert_eq!(created.source, NarrativeSource::Template);
        assert!(created.scenario.contains("earthquake"));
        assert!(created.scenario.contains("San Francisco"));
        assert!(created.scenario.contains("5000"));

        // Session is retrievable immediately
        let session = service.store().get(created.session_id).await.unwrap();
        assert_eq!(session.step, 1);
        assert_eq!(session.scenario, created.scenario);
    }

    #[tokio::test]
    async fn test_generate_with_provider_uses_its_text() {
        let service = ScenarioService::new(
            Arc::new(SessionStore::new()),
            Some(Arc::new(CannedProvider("A dam has failed upstream."))),
            500,
        );

        let created = service
            .generate_scenario("flood", "Sacramento", 800)
            .await
            .unwrap();

        assert_eq!(created.source, NarrativeSource::Provider);
        assert_eq!(created.scenario, "A dam has failed upstream.");
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_template() {
        let service = ScenarioService::new(
            Arc::new(SessionStore::new()),
            Some(Arc::new(FailingProvider)),
            500,
        );

        let created = service
            .generate_scenario("wildfire", "Los Angeles", 12_000)
            .await
            .unwrap();

        assert_eq!(created.source, NarrativeSource::Template);
        assert_eq!(
            created.scenario,
            template::initial_scenario("wildfire", "Los Angeles", 12_000)
        );
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_inputs() {
        let service = template_only_service();

        let err = service.generate_scenario("", "Tokyo", 10).await.unwrap_err();
        assert!(err.is_invalid_input());

        let err = service
            .generate_scenario("typhoon", "  ", 10)
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_advance_increments_step() {
        let service = template_only_service();

        let created = service
            .generate_scenario("earthquake", "San Francisco", 5000)
            .await
            .unwrap();

        let advanced = service
            .advance_scenario(created.session_id, "deploy search and rescue teams")
            .await
            .unwrap();

        assert_eq!(advanced.step, 2);
        assert!(advanced.scenario.contains("deploy search and rescue teams"));

        let again = service
            .advance_scenario(created.session_id, "set up field hospitals")
            .await
            .unwrap();
        assert_eq!(again.step, 3);
    }

    #[tokio::test]
    async fn test_advance_failure_falls_back_to_template() {
        let service = ScenarioService::new(
            Arc::new(SessionStore::new()),
            Some(Arc::new(FailingProvider)),
            500,
        );

        let created = service
            .generate_scenario("flood", "Houston", 300)
            .await
            .unwrap();
        let advanced = service
            .advance_scenario(created.session_id, "open the floodgates")
            .await
            .unwrap();

        assert_eq!(advanced.source, NarrativeSource::Template);
        assert_eq!(advanced.scenario, template::next_step("open the floodgates"));
    }

    #[tokio::test]
    async fn test_advance_unknown_session() {
        let service = template_only_service();

        let err = service
            .advance_scenario(Uuid::new_v4(), "do something")
            .await
            .unwrap_err();
        assert!(err.is_session_not_found());
    }

    #[tokio::test]
    async fn test_advance_rejects_empty_decision() {
        let service = template_only_service();

        let err = service
            .advance_scenario(Uuid::new_v4(), "   ")
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_concurrent_generates_produce_distinct_sessions() {
        let service = Arc::new(template_only_service());
        let mut handles = vec![];

        for _ in 0..16 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .generate_scenario("earthquake", "San Francisco", 5000)
                    .await
                    .unwrap()
                    .session_id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 16);
        assert_eq!(service.store().len().await, 16);
    }

    #[test]
    fn test_scenario_prompt_contents() {
        let prompt = build_scenario_prompt("earthquake", "San Francisco", 5000);

        assert!(prompt.contains("- Crisis Type: earthquake"));
        assert!(prompt.contains("- Location: San Francisco"));
        assert!(prompt.contains("- People Affected: 5000"));
        assert!(prompt.contains("4-6 sentence scenario"));
    }

    #[test]
    fn test_next_step_prompt_contents() {
        let prompt = build_next_step_prompt("A quake hit.", "evacuate the bridge");

        assert!(prompt.contains("Previous Crisis Scenario:\nA quake hit."));
        assert!(prompt.contains("User Decision: evacuate the bridge"));
        assert!(prompt.contains("Current status of the crisis"));
    }
}
