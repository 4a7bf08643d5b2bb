use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::errors::PlanError;

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: i32,
    pub is_male: bool,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl NewUser {
    /// Trims and lowercases the email, then checks every field.
    pub fn normalize(mut self) -> Result<Self, PlanError> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        if self.name.is_empty() {
            return Err(PlanError::InvalidProfile("name must not be empty".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(PlanError::InvalidProfile("invalid email".into()));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(PlanError::InvalidProfile("height must be positive".into()));
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(PlanError::InvalidProfile("weight must be positive".into()));
        }
        if self.age < 0 {
            return Err(PlanError::InvalidProfile("age must not be negative".into()));
        }
        Ok(self)
    }
}
