use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between a profile and a persisted plan.
///
/// All variants are terminal for the current operation: nothing is
/// retried inside the crate, and a failed normalization never persists
/// a partial plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Network-level failure talking to an endpoint.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The completion endpoint answered with a non-200 status.
    #[error("completion endpoint returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    /// The completion envelope decoded but carried zero choices.
    #[error("completion contained no choices")]
    EmptyCompletion,

    /// The model text was empty after stripping formatting artifacts.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The model text is not a JSON object.
    #[error("response is not a JSON object: {0}")]
    MalformedJson(String),

    /// A required top-level field is absent or has the wrong type.
    #[error("missing or mistyped field `{0}`")]
    MissingField(&'static str),

    /// A macronutrient is absent, non-integer, or outside (0, 1000) grams.
    #[error("invalid macronutrients: {0}")]
    InvalidMacronutrients(String),

    /// Daily calories outside the accepted 1200..=5000 range.
    #[error("daily calories {0} outside accepted range (1200-5000)")]
    InvalidCalorieRange(i64),

    /// A malformed meal entry under the strict meal policy.
    #[error("invalid meal suggestions: {0}")]
    InvalidMealSuggestions(String),

    /// Fewer than three meals survived validation, or one of
    /// Breakfast/Lunch/Dinner is absent.
    #[error("required meals missing from suggestions")]
    MissingRequiredMeals,

    /// The persistence endpoint answered with a non-success status.
    #[error("store request failed with {status}: {body}")]
    Store { status: StatusCode, body: String },
}
