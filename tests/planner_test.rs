use std::sync::Mutex;

use async_trait::async_trait;
use nutriplan::error::PlanError;
use nutriplan::models::{
    ActivityLevel, Gender, NutritionGoal, NutritionPlan, Profile, UnitSystem,
};
use nutriplan::planner::{Complete, Persist, Planner};
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

struct ScriptedCompletion {
    reply: Result<String, StatusCode>,
}

impl ScriptedCompletion {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    fn failing(status: StatusCode) -> Self {
        Self { reply: Err(status) }
    }
}

#[async_trait]
impl Complete for ScriptedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, PlanError> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(PlanError::Upstream {
                status: *status,
                body: String::new(),
            }),
        }
    }
}

#[derive(Default)]
struct MemoryStore {
    profiles: Mutex<Vec<Profile>>,
    plans: Mutex<Vec<NutritionPlan>>,
}

#[async_trait]
impl Persist for MemoryStore {
    async fn save_profile(&self, profile: &Profile) -> Result<(), PlanError> {
        let mut profiles = self.profiles.lock().unwrap();
        profiles.retain(|p| p.id != profile.id);
        profiles.push(profile.clone());
        Ok(())
    }

    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>, PlanError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn save_plan(&self, plan: &NutritionPlan) -> Result<(), PlanError> {
        self.plans.lock().unwrap().push(plan.clone());
        Ok(())
    }

    async fn fetch_plans(&self, user_id: Uuid) -> Result<Vec<NutritionPlan>, PlanError> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

fn profile() -> Profile {
    Profile::new(
        Uuid::new_v4(),
        "Test",
        30,
        70.0,
        170.0,
        Gender::Male,
        ActivityLevel::ModeratelyActive,
        NutritionGoal::Maintenance,
        UnitSystem::Metric,
    )
    .unwrap()
}

fn valid_reply() -> String {
    json!({
        "daily_calories": 2200,
        "macronutrients": { "protein": 150, "carbs": 250, "fats": 70 },
        "meal_suggestions": [
            { "meal": "Breakfast", "suggestions": ["Oatmeal"] },
            { "meal": "Lunch", "suggestions": ["Chicken salad"] },
            { "meal": "Dinner", "suggestions": ["Grilled salmon"] }
        ],
        "recommendations": ["Drink more water"]
    })
    .to_string()
}

#[tokio::test]
async fn generate_plan_persists_exactly_one_plan() {
    let planner = Planner::new(ScriptedCompletion::ok(valid_reply()), MemoryStore::default());
    let user = profile();

    let plan = planner.generate_plan(&user).await.unwrap();

    assert_eq!(plan.user_id, user.id);
    let stored = planner.store().fetch_plans(user.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, plan.id);
}

#[tokio::test]
async fn invalid_model_output_persists_nothing() {
    let planner = Planner::new(
        ScriptedCompletion::ok("Sorry, I cannot help."),
        MemoryStore::default(),
    );
    let user = profile();

    let result = planner.generate_plan(&user).await;

    assert!(matches!(result, Err(PlanError::MalformedJson(_))));
    assert!(planner.store().fetch_plans(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_forwarded_unchanged() {
    let planner = Planner::new(
        ScriptedCompletion::failing(StatusCode::TOO_MANY_REQUESTS),
        MemoryStore::default(),
    );
    let user = profile();

    let result = planner.generate_plan(&user).await;

    match result {
        Err(PlanError::Upstream { status, .. }) => {
            assert_eq!(status, StatusCode::TOO_MANY_REQUESTS)
        }
        other => panic!("expected Upstream error, got {other:?}"),
    }
    assert!(planner.store().fetch_plans(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_calories_persist_nothing() {
    let reply = json!({
        "daily_calories": 900,
        "macronutrients": { "protein": 150, "carbs": 250, "fats": 70 },
        "meal_suggestions": [
            { "meal": "Breakfast", "suggestions": ["Oatmeal"] },
            { "meal": "Lunch", "suggestions": ["Chicken salad"] },
            { "meal": "Dinner", "suggestions": ["Grilled salmon"] }
        ],
        "recommendations": []
    })
    .to_string();
    let planner = Planner::new(ScriptedCompletion::ok(reply), MemoryStore::default());
    let user = profile();

    let result = planner.generate_plan(&user).await;

    assert!(matches!(result, Err(PlanError::InvalidCalorieRange(900))));
    assert!(planner.store().fetch_plans(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn refresh_appends_advice_and_repersists() {
    let planner = Planner::new(ScriptedCompletion::ok(valid_reply()), MemoryStore::default());
    let user = profile();
    let plan = planner.generate_plan(&user).await.unwrap();

    let advice = "Swap one snack for a handful of walnuts.";
    let refresher = Planner::new(ScriptedCompletion::ok(advice), MemoryStore::default());
    refresher.store().save_plan(&plan).await.unwrap();

    let updated = refresher.refresh_recommendations(&user, &plan).await.unwrap();

    // The raw completion text lands as one new recommendation, unvalidated.
    assert_eq!(updated.recommendations.len(), plan.recommendations.len() + 1);
    assert_eq!(updated.recommendations.last().unwrap(), advice);
    assert_eq!(updated.id, plan.id);
    assert_eq!(updated.daily_calories, plan.daily_calories);

    let stored = refresher.store().fetch_plans(user.id).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn failed_refresh_leaves_the_plan_untouched() {
    let planner = Planner::new(ScriptedCompletion::ok(valid_reply()), MemoryStore::default());
    let user = profile();
    let plan = planner.generate_plan(&user).await.unwrap();

    let refresher = Planner::new(
        ScriptedCompletion::failing(StatusCode::INTERNAL_SERVER_ERROR),
        MemoryStore::default(),
    );

    let result = refresher.refresh_recommendations(&user, &plan).await;

    assert!(matches!(result, Err(PlanError::Upstream { .. })));
    assert_eq!(plan.recommendations.len(), 1);
    assert!(refresher.store().fetch_plans(user.id).await.unwrap().is_empty());
}
