use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::CalorieFormula, nutrition::ActivityLevel, recipes::repo_types::Recipe};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    pub goal_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRecipe {
    pub id: Uuid,
    pub title: String,
    pub calories: f64,
}

impl From<&Recipe> for PlannedRecipe {
    fn from(r: &Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            calories: r.calories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealSlot {
    pub meal_order: i16,
    pub recipes: Vec<PlannedRecipe>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day: i16,
    pub meals: Vec<MealSlot>,
}

/// What `generate` reports back. Calorie and BMI figures are rounded to 2 decimals.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub user_id: Uuid,
    pub goal_id: Uuid,
    pub bmi: f64,
    pub bmr: f64,
    pub maintenance_calories: f64,
    pub daily_calories: f64,
    pub calories_per_meal: f64,
    pub meals_per_day: i16,
    pub recipes_per_meal: u32,
    pub activity_level: ActivityLevel,
    pub calorie_formula: CalorieFormula,
    pub weekly_plan: Vec<DayPlan>,
}
