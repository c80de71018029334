//! Nutrition planning engine.
//!
//! Takes a user profile, asks a chat-completion model for a structured
//! nutrition plan, validates the untrusted response field by field, and
//! persists the result. The normalizer is the trust boundary: model output
//! is decoded into a generic JSON value first and only becomes a
//! [`models::NutritionPlan`] after every range and completeness check has
//! passed.

pub mod completion;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod planner;
pub mod prompt;
pub mod store;

pub use completion::CompletionClient;
pub use config::Config;
pub use error::PlanError;
pub use models::{
    ActivityLevel, Gender, Macronutrients, MealSuggestion, NutritionGoal, NutritionPlan, Profile,
    UnitSystem,
};
pub use normalize::{normalize, normalize_with_policy, MealPolicy};
pub use planner::{Complete, Persist, Planner};
pub use store::StoreClient;
