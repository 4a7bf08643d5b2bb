//! Body-metric and calorie-target formulas used by the meal planner.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;
use tracing::warn;

use crate::config::CalorieFormula;

/// Fixed daily deficit or surplus applied when the goal weight differs from the current one.
pub const WEIGHT_CHANGE_KCAL: f64 = 500.0;
/// Starting point of the baseline formula.
pub const BASELINE_KCAL: f64 = 2000.0;
/// Daily kcal adjustment per kg between current and desired weight (baseline formula).
pub const KCAL_PER_KG_DELTA: f64 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_male_flag(is_male: bool) -> Self {
        if is_male {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

lazy_static! {
    static ref ACTIVITY_LEVELS: HashMap<&'static str, ActivityLevel> = {
        let mut m = HashMap::new();
        m.insert("sedentary", ActivityLevel::Sedentary);
        m.insert("light", ActivityLevel::Light);
        m.insert("moderate", ActivityLevel::Moderate);
        m.insert("active", ActivityLevel::Active);
        m.insert("very_active", ActivityLevel::VeryActive);
        m
    };
}

impl ActivityLevel {
    /// Looks a level up case-insensitively; anything unrecognised counts as sedentary.
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match ACTIVITY_LEVELS.get(key.as_str()) {
            Some(level) => *level,
            None => {
                warn!(activity_level = %raw, "unknown activity level, using sedentary");
                ActivityLevel::Sedentary
            }
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BodyProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: i32,
    pub sex: Sex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieTargets {
    pub bmr: f64,
    pub maintenance: f64,
    pub daily: f64,
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Mifflin–St Jeor basal metabolic rate in kcal/day.
pub fn bmr(weight_kg: f64, height_cm: f64, age: i32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

pub fn daily_calories(
    formula: CalorieFormula,
    profile: &BodyProfile,
    activity: ActivityLevel,
    desired_weight_kg: f64,
) -> CalorieTargets {
    let bmr = bmr(profile.weight_kg, profile.height_cm, profile.age, profile.sex);
    let multiplier = activity.multiplier();
    match formula {
        CalorieFormula::MifflinStJeor => {
            let maintenance = bmr * multiplier;
            let daily = if desired_weight_kg < profile.weight_kg {
                maintenance - WEIGHT_CHANGE_KCAL
            } else if desired_weight_kg > profile.weight_kg {
                maintenance + WEIGHT_CHANGE_KCAL
            } else {
                maintenance
            };
            CalorieTargets {
                bmr,
                maintenance,
                daily,
            }
        }
        CalorieFormula::Baseline => {
            let adjustment = (profile.weight_kg - desired_weight_kg) * KCAL_PER_KG_DELTA;
            CalorieTargets {
                bmr,
                maintenance: BASELINE_KCAL * multiplier,
                daily: (BASELINE_KCAL + adjustment) * multiplier,
            }
        }
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
