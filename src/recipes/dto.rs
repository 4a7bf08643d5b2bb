use serde::Deserialize;

use crate::errors::PlanError;

/// Body of `POST /recipes`. Unknown keys are rejected at deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
}

impl NewRecipe {
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.title.trim().is_empty() {
            return Err(PlanError::InvalidRecipe("title must not be empty".into()));
        }
        if !self.calories.is_finite() || self.calories < 0.0 {
            return Err(PlanError::InvalidRecipe(
                "calories must be a non-negative number".into(),
            ));
        }
        let macros = [
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
        ];
        for (name, value) in macros {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(PlanError::InvalidRecipe(format!(
                        "{name} must be a non-negative number"
                    )));
                }
            }
        }
        Ok(())
    }
}
