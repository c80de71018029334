//! Validation and conversion of raw model output into a [`NutritionPlan`].
//!
//! The model's output shape is a soft contract: it drifts, wraps JSON in
//! markdown fences, and drops fields. Nothing here is trusted until it has
//! passed every stage. Stages run cheapest-first, ending with the
//! cross-field meal completeness check, so malformed input is rejected as
//! early as possible. Every failure names the field or value that sank it.

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::PlanError;
use crate::models::{Macronutrients, MealSuggestion, NutritionPlan};

/// Meal categories that must survive validation for a plan to be usable.
pub const REQUIRED_MEALS: [&str; 3] = ["Breakfast", "Lunch", "Dinner"];

/// Accepted daily calorie range (kcal), inclusive.
pub const CALORIE_RANGE: std::ops::RangeInclusive<i64> = 1200..=5000;

/// How to treat a meal entry that fails shape validation.
///
/// Historical behavior is ambiguous between dropping bad entries and
/// rejecting the whole response, so the strictness is a policy choice
/// rather than a hard-coded rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MealPolicy {
    /// Drop malformed entries, fail only if the required meals are lost.
    #[default]
    DropMalformed,
    /// Any malformed entry fails the whole normalization.
    RejectMalformed,
}

/// Strips a markdown code fence wrapping the model output.
///
/// Idempotent: stripping already-stripped text is a no-op.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Converts raw completion text into a validated [`NutritionPlan`] owned
/// by `owner`, with the default permissive meal policy.
pub fn normalize(raw: &str, owner: Uuid) -> Result<NutritionPlan, PlanError> {
    normalize_with_policy(raw, owner, MealPolicy::default())
}

/// Converts raw completion text into a validated [`NutritionPlan`].
///
/// All-or-nothing: either every stage passes and a fully valid plan comes
/// back, or a typed error describes the first stage that failed.
pub fn normalize_with_policy(
    raw: &str,
    owner: Uuid,
    policy: MealPolicy,
) -> Result<NutritionPlan, PlanError> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(PlanError::EmptyResponse);
    }

    let parsed: Value =
        serde_json::from_str(text).map_err(|e| PlanError::MalformedJson(e.to_string()))?;
    let root = parsed
        .as_object()
        .ok_or_else(|| PlanError::MalformedJson("top level is not an object".to_string()))?;

    let daily_calories = root
        .get("daily_calories")
        .and_then(Value::as_i64)
        .ok_or(PlanError::MissingField("daily_calories"))?;
    let macros = root
        .get("macronutrients")
        .and_then(Value::as_object)
        .ok_or(PlanError::MissingField("macronutrients"))?;
    let meal_entries = root
        .get("meal_suggestions")
        .and_then(Value::as_array)
        .filter(|entries| entries.iter().all(Value::is_object))
        .ok_or(PlanError::MissingField("meal_suggestions"))?;
    let recommendations = root
        .get("recommendations")
        .and_then(Value::as_array)
        .ok_or(PlanError::MissingField("recommendations"))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or(PlanError::MissingField("recommendations"))
        })
        .collect::<Result<Vec<String>, PlanError>>()?;

    let macronutrients = Macronutrients {
        protein: macro_grams(macros, "protein")?,
        carbs: macro_grams(macros, "carbs")?,
        fats: macro_grams(macros, "fats")?,
    };

    if !CALORIE_RANGE.contains(&daily_calories) {
        return Err(PlanError::InvalidCalorieRange(daily_calories));
    }

    let meal_suggestions = validate_meals(meal_entries, policy)?;

    tracing::debug!(
        daily_calories,
        meals = meal_suggestions.len(),
        recommendations = recommendations.len(),
        "normalized nutrition plan"
    );

    Ok(NutritionPlan {
        id: Uuid::new_v4(),
        user_id: owner,
        daily_calories: daily_calories as u32,
        macronutrients,
        meal_suggestions,
        recommendations,
        created_at: Utc::now(),
    })
}

/// Reads one macronutrient as integer grams in the open interval (0, 1000).
fn macro_grams(macros: &Map<String, Value>, key: &str) -> Result<u32, PlanError> {
    let grams = macros.get(key).and_then(Value::as_i64).ok_or_else(|| {
        PlanError::InvalidMacronutrients(format!("missing or non-integer `{key}`"))
    })?;
    if grams <= 0 || grams >= 1000 {
        return Err(PlanError::InvalidMacronutrients(format!(
            "`{key}` is {grams} g, outside accepted range"
        )));
    }
    Ok(grams as u32)
}

/// Validates meal entries, preserving input order.
///
/// An entry needs a non-empty `meal` name and a non-empty list of non-empty
/// suggestion strings. What happens to entries that fail depends on the
/// policy; either way the surviving set must still contain at least three
/// meals including every required category.
fn validate_meals(
    entries: &[Value],
    policy: MealPolicy,
) -> Result<Vec<MealSuggestion>, PlanError> {
    let mut meals = Vec::with_capacity(entries.len());

    for entry in entries {
        match parse_meal_entry(entry) {
            Some(meal) => meals.push(meal),
            None if policy == MealPolicy::RejectMalformed => {
                return Err(PlanError::InvalidMealSuggestions(format!(
                    "malformed entry: {entry}"
                )));
            }
            None => {
                tracing::warn!(entry = %entry, "dropping malformed meal entry");
            }
        }
    }

    let complete = meals.len() >= REQUIRED_MEALS.len()
        && REQUIRED_MEALS
            .iter()
            .all(|required| meals.iter().any(|m| m.name == *required));
    if !complete {
        return Err(PlanError::MissingRequiredMeals);
    }

    Ok(meals)
}

fn parse_meal_entry(entry: &Value) -> Option<MealSuggestion> {
    let name = entry.get("meal").and_then(Value::as_str)?;
    if name.is_empty() {
        return None;
    }

    let suggestions = entry
        .get("suggestions")
        .and_then(Value::as_array)?
        .iter()
        .map(|s| s.as_str().map(String::from))
        .collect::<Option<Vec<String>>>()?;
    if suggestions.is_empty() || suggestions.iter().any(String::is_empty) {
        return None;
    }

    Some(MealSuggestion {
        id: Uuid::new_v4(),
        name: name.to_string(),
        suggestions,
    })
}
