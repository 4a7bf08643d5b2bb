use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{BodyProfile, Sex};

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: i32,
    pub is_male: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn body_profile(&self) -> BodyProfile {
        BodyProfile {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            sex: Sex::from_male_flag(self.is_male),
        }
    }
}
