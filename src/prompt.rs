use crate::models::{NutritionPlan, Profile, UnitSystem};

/// Weight formatted for the profile's display preference.
fn weight_line(profile: &Profile) -> String {
    match profile.preferred_units {
        UnitSystem::Imperial => format!("{} lbs", profile.weight_lbs() as i64),
        UnitSystem::Metric => format!("{} kg", profile.weight_kg() as i64),
    }
}

fn height_line(profile: &Profile) -> String {
    match profile.preferred_units {
        UnitSystem::Imperial => {
            format!("{}'{}\"", profile.height_feet(), profile.height_inches())
        }
        UnitSystem::Metric => format!("{} cm", profile.height_cm() as i64),
    }
}

/// Builds the plan-generation prompt for a profile.
///
/// Pure function of the profile's fields; the embedded JSON schema is the
/// shape the normalizer validates against.
pub fn plan_request(profile: &Profile) -> String {
    format!(
        r#"As a nutrition expert, create a detailed nutrition plan in JSON format for a person with these characteristics:
- Age: {age}
- Gender: {gender}
- Weight: {weight}
- Height: {height}
- Activity Level: {activity}
- Goal: {goal}

Return the response in this exact JSON format:
{{
    "daily_calories": number,
    "macronutrients": {{
        "protein": number (in grams),
        "carbs": number (in grams),
        "fats": number (in grams)
    }},
    "meal_suggestions": [
        {{
            "meal": "Breakfast",
            "suggestions": ["suggestion1", "suggestion2", "suggestion3"]
        }},
        {{
            "meal": "Lunch",
            "suggestions": ["suggestion1", "suggestion2", "suggestion3"]
        }},
        {{
            "meal": "Dinner",
            "suggestions": ["suggestion1", "suggestion2", "suggestion3"]
        }},
        {{
            "meal": "Snacks",
            "suggestions": ["suggestion1", "suggestion2"]
        }}
    ],
    "recommendations": [
        "recommendation1",
        "recommendation2",
        "recommendation3"
    ]
}}

Base the calculations on the person's characteristics and these factors:
1. BMR (Basal Metabolic Rate)
2. Activity level multiplier
3. Goal-specific adjustment
4. Protein needs based on weight and activity
5. Balanced macro distribution for the specific goal"#,
        age = profile.age,
        gender = profile.gender.label(),
        weight = weight_line(profile),
        height = height_line(profile),
        activity = profile.activity_level.label(),
        goal = profile.nutrition_goal.label(),
    )
}

/// Builds the second-pass prompt asking for free-text recommendations
/// about an existing plan.
pub fn recommendations_request(profile: &Profile, plan: &NutritionPlan) -> String {
    format!(
        r#"Analyze this nutrition plan and provide personalized recommendations for:
- Age: {age}
- Weight: {weight}
- Height: {height}
- Goal: {goal}

Current plan:
- Daily calories: {calories}
- Protein: {protein}g
- Carbs: {carbs}g
- Fats: {fats}g

Provide specific recommendations for improving the plan and achieving the user's goals."#,
        age = profile.age,
        weight = weight_line(profile),
        height = height_line(profile),
        goal = profile.nutrition_goal.label(),
        calories = plan.daily_calories,
        protein = plan.macronutrients.protein,
        carbs = plan.macronutrients.carbs,
        fats = plan.macronutrients.fats,
    )
}
