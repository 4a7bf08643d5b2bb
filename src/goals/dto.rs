use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::errors::PlanError;

/// Body of `POST /goals`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewGoal {
    pub user_id: Uuid,
    pub desired_weight_kg: f64,
    pub activity_level: String,
    pub meals_per_day: i32,
    #[serde(default, with = "super::iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "super::iso_date::option")]
    pub end_date: Option<Date>,
}

impl NewGoal {
    pub fn normalize(mut self) -> Result<Self, PlanError> {
        self.activity_level = self.activity_level.trim().to_string();

        if !(self.desired_weight_kg.is_finite() && self.desired_weight_kg > 0.0) {
            return Err(PlanError::InvalidGoal("desired weight must be positive".into()));
        }
        if self.activity_level.is_empty() {
            return Err(PlanError::InvalidGoal("activity level is missing".into()));
        }
        if self.meals_per_day < 1 || self.meals_per_day > i32::from(i16::MAX) {
            return Err(PlanError::InvalidGoal(
                "number of meals per day must be at least 1".into(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(PlanError::InvalidGoal("end date is before start date".into()));
            }
        }
        Ok(self)
    }
}
