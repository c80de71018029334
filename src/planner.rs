use async_trait::async_trait;
use uuid::Uuid;

use crate::completion::CompletionClient;
use crate::config::Config;
use crate::error::PlanError;
use crate::models::{NutritionPlan, Profile};
use crate::normalize::{normalize_with_policy, MealPolicy};
use crate::prompt;
use crate::store::StoreClient;

/// Source of raw completion text.
#[async_trait]
pub trait Complete {
    async fn complete(&self, prompt: &str) -> Result<String, PlanError>;
}

#[async_trait]
impl Complete for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, PlanError> {
        CompletionClient::complete(self, prompt).await
    }
}

/// Persistence collaborator for profiles and plans.
#[async_trait]
pub trait Persist {
    async fn save_profile(&self, profile: &Profile) -> Result<(), PlanError>;
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>, PlanError>;
    async fn save_plan(&self, plan: &NutritionPlan) -> Result<(), PlanError>;
    async fn fetch_plans(&self, user_id: Uuid) -> Result<Vec<NutritionPlan>, PlanError>;

    /// Returns the stored profile for `id`, creating and persisting the
    /// onboarding default when `id` is unknown or dangling.
    async fn ensure_profile(&self, id: Option<Uuid>) -> Result<Profile, PlanError> {
        if let Some(id) = id {
            if let Some(profile) = self.fetch_profile(id).await? {
                return Ok(profile);
            }
            tracing::debug!(%id, "stored profile id has no row, creating a new profile");
        }

        let profile = Profile::onboarding_default();
        self.save_profile(&profile).await?;
        Ok(profile)
    }
}

#[async_trait]
impl Persist for StoreClient {
    async fn save_profile(&self, profile: &Profile) -> Result<(), PlanError> {
        StoreClient::save_profile(self, profile).await
    }

    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>, PlanError> {
        StoreClient::fetch_profile(self, id).await
    }

    async fn save_plan(&self, plan: &NutritionPlan) -> Result<(), PlanError> {
        StoreClient::save_plan(self, plan).await
    }

    async fn fetch_plans(&self, user_id: Uuid) -> Result<Vec<NutritionPlan>, PlanError> {
        StoreClient::fetch_plans(self, user_id).await
    }
}

/// Sequences prompt, completion, normalization, and persistence.
///
/// Collaborators are injected so tests can substitute doubles. Every
/// failure propagates unchanged: there is no fallback plan, and nothing
/// is persisted unless normalization succeeded first.
pub struct Planner<C, S> {
    completion: C,
    store: S,
    meal_policy: MealPolicy,
}

impl Planner<CompletionClient, StoreClient> {
    /// Wires up the live clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CompletionClient::new(&config.api_key),
            StoreClient::new(&config.store_url, &config.store_key),
        )
    }
}

impl<C: Complete, S: Persist> Planner<C, S> {
    pub fn new(completion: C, store: S) -> Self {
        Self {
            completion,
            store,
            meal_policy: MealPolicy::default(),
        }
    }

    pub fn with_meal_policy(mut self, policy: MealPolicy) -> Self {
        self.meal_policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generates, validates, and persists a fresh plan for a profile.
    pub async fn generate_plan(&self, profile: &Profile) -> Result<NutritionPlan, PlanError> {
        let prompt = prompt::plan_request(profile);
        let raw = self.completion.complete(&prompt).await?;
        let plan = normalize_with_policy(&raw, profile.id, self.meal_policy)?;
        self.store.save_plan(&plan).await?;

        tracing::debug!(plan_id = %plan.id, user_id = %profile.id, "plan generated and persisted");
        Ok(plan)
    }

    /// Asks the model for free-text advice on an existing plan and appends
    /// it as one new recommendation, re-persisting the whole plan.
    ///
    /// Unlike generation, this path treats the completion as opaque text
    /// with no JSON validation. The caller's plan is untouched on failure.
    pub async fn refresh_recommendations(
        &self,
        profile: &Profile,
        plan: &NutritionPlan,
    ) -> Result<NutritionPlan, PlanError> {
        let prompt = prompt::recommendations_request(profile, plan);
        let advice = self.completion.complete(&prompt).await?;

        let mut updated = plan.clone();
        updated.recommendations.push(advice);
        self.store.save_plan(&updated).await?;

        Ok(updated)
    }
}
