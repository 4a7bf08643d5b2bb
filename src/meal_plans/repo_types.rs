use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One assignment to write: recipe `recipe_id` sits in `slot` of meal `meal_order` on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPlanEntry {
    pub recipe_id: Uuid,
    pub day: i16,
    pub meal_order: i16,
    pub slot: i16,
}

/// Stored plan entry joined with the recipe it points at.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PlanEntryView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_id: Uuid,
    pub recipe_id: Uuid,
    pub day: i16,
    pub meal_order: i16,
    pub slot: i16,
    pub recipe_title: String,
    pub calories: f64,
}
