use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pounds per kilogram.
pub const LBS_PER_KG: f64 = 2.20462;
/// Centimeters per foot.
pub const CM_PER_FOOT: f64 = 30.48;
/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "Sedentary")]
    Sedentary,
    #[serde(rename = "Lightly Active")]
    LightlyActive,
    #[serde(rename = "Moderately Active")]
    ModeratelyActive,
    #[serde(rename = "Very Active")]
    VeryActive,
    #[serde(rename = "Extra Active")]
    ExtraActive,
}

impl ActivityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtraActive => "Extra Active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutritionGoal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Maintenance")]
    Maintenance,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    #[serde(rename = "Healthy Eating")]
    HealthyEating,
}

impl NutritionGoal {
    pub fn label(&self) -> &'static str {
        match self {
            NutritionGoal::WeightLoss => "Weight Loss",
            NutritionGoal::Maintenance => "Maintenance",
            NutritionGoal::MuscleGain => "Muscle Gain",
            NutritionGoal::HealthyEating => "Healthy Eating",
        }
    }
}

/// Display preference only; stored weight/height stay metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

/// The user's biometric and preference record.
///
/// Weight and height are canonical metric (kg, cm) regardless of the
/// display preference; imperial values are computed on access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    /// Weight in kg
    weight: f64,
    /// Height in cm
    height: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub nutrition_goal: NutritionGoal,
    pub preferred_units: UnitSystem,
}

impl Profile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        name: &str,
        age: u32,
        weight_kg: f64,
        height_cm: f64,
        gender: Gender,
        activity_level: ActivityLevel,
        nutrition_goal: NutritionGoal,
        preferred_units: UnitSystem,
    ) -> Result<Self> {
        ensure!(age > 0, "age must be positive");
        ensure!(weight_kg > 0.0, "weight must be positive");
        ensure!(height_cm > 0.0, "height must be positive");

        let name = if name.is_empty() {
            "New User".to_string()
        } else {
            name.to_string()
        };

        Ok(Self {
            id,
            name,
            age,
            weight: weight_kg,
            height: height_cm,
            gender,
            activity_level,
            nutrition_goal,
            preferred_units,
        })
    }

    /// The starter profile written when no stored profile exists yet.
    pub fn onboarding_default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "New User".to_string(),
            age: 30,
            weight: 70.0,
            height: 170.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::ModeratelyActive,
            nutrition_goal: NutritionGoal::Maintenance,
            preferred_units: UnitSystem::Imperial,
        }
    }

    /// Weight in kg.
    pub fn weight_kg(&self) -> f64 {
        self.weight
    }

    /// Height in cm.
    pub fn height_cm(&self) -> f64 {
        self.height
    }

    pub fn weight_lbs(&self) -> f64 {
        self.weight * LBS_PER_KG
    }

    /// Whole feet of the height.
    pub fn height_feet(&self) -> u32 {
        (self.height / CM_PER_FOOT) as u32
    }

    /// Remaining inches past the whole feet.
    pub fn height_inches(&self) -> u32 {
        ((self.height % CM_PER_FOOT) / CM_PER_INCH) as u32
    }

    /// Replaces the name unless the input is empty.
    pub fn set_name(&mut self, name: &str) {
        if !name.is_empty() {
            self.name = name.to_string();
        }
    }

    pub fn set_weight_kg(&mut self, weight_kg: f64) -> Result<()> {
        ensure!(weight_kg > 0.0, "weight must be positive");
        self.weight = weight_kg;
        Ok(())
    }

    pub fn set_weight_lbs(&mut self, pounds: f64) -> Result<()> {
        self.set_weight_kg(pounds / LBS_PER_KG)
    }

    pub fn set_height_cm(&mut self, height_cm: f64) -> Result<()> {
        ensure!(height_cm > 0.0, "height must be positive");
        self.height = height_cm;
        Ok(())
    }

    /// Sets the height from feet and inches; inches are clamped to 0..=11.
    pub fn set_height_imperial(&mut self, feet: u32, inches: u32) -> Result<()> {
        let inches = inches.min(11);
        self.set_height_cm(f64::from(feet) * CM_PER_FOOT + f64::from(inches) * CM_PER_INCH)
    }

    /// Basal metabolic rate via the Harris-Benedict equation.
    ///
    /// For `Gender::Other` the male and female estimates are averaged.
    pub fn basal_metabolic_rate(&self) -> f64 {
        let age = f64::from(self.age);
        let male = 88.362 + 13.397 * self.weight + 4.799 * self.height - 5.677 * age;
        let female = 447.593 + 9.247 * self.weight + 3.098 * self.height - 4.330 * age;
        match self.gender {
            Gender::Male => male,
            Gender::Female => female,
            Gender::Other => (male + female) / 2.0,
        }
    }
}

/// Daily macronutrient targets in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macronutrients {
    /// Protein (g)
    pub protein: u32,
    /// Carbs (g)
    pub carbs: u32,
    /// Fats (g)
    pub fats: u32,
}

/// One meal category with its suggested dishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub id: Uuid,
    /// Category name as emitted by the model (e.g. "Breakfast").
    #[serde(rename = "meal")]
    pub name: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
    Other,
}

impl MealSuggestion {
    /// Classifies the free-form category name for display grouping.
    pub fn category(&self) -> MealCategory {
        match self.name.to_lowercase().as_str() {
            "breakfast" => MealCategory::Breakfast,
            "lunch" => MealCategory::Lunch,
            "dinner" => MealCategory::Dinner,
            "snacks" => MealCategory::Snacks,
            _ => MealCategory::Other,
        }
    }
}

/// A generated nutrition plan tied to one profile.
///
/// Produced exclusively by the normalizer from validated model output;
/// the numeric fields never change after creation. Serialized field names
/// are the persistence wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub daily_calories: u32,
    pub macronutrients: Macronutrients,
    pub meal_suggestions: Vec<MealSuggestion>,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NutritionPlan {
    /// Calories implied by the macro targets (4/4/9 kcal per gram).
    ///
    /// Informational only; allowed to diverge from `daily_calories`.
    pub fn calories_from_macros(&self) -> u32 {
        self.macronutrients.protein * 4
            + self.macronutrients.carbs * 4
            + self.macronutrients.fats * 9
    }

    pub fn protein_percent(&self) -> f64 {
        self.macro_percent(self.macronutrients.protein * 4)
    }

    pub fn carbs_percent(&self) -> f64 {
        self.macro_percent(self.macronutrients.carbs * 4)
    }

    pub fn fats_percent(&self) -> f64 {
        self.macro_percent(self.macronutrients.fats * 9)
    }

    fn macro_percent(&self, kcal: u32) -> f64 {
        if self.daily_calories == 0 {
            return 0.0;
        }
        f64::from(kcal) / f64::from(self.daily_calories) * 100.0
    }
}
