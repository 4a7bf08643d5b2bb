use serde::Serialize;
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

/// A dietary goal owned by a user; the planner reads one per generation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub desired_weight_kg: f64,
    pub activity_level: Option<String>,
    pub meals_per_day: i32,
    #[serde(with = "super::iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(with = "super::iso_date::option")]
    pub end_date: Option<Date>,
}
