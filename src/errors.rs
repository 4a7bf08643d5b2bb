use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("invalid goal: {0}")]
    InvalidGoal(String),

    #[error("invalid user profile: {0}")]
    InvalidProfile(String),

    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not enough recipes between {min_kcal:.0} and {max_kcal:.0} kcal: need {required}, found {found}")]
    InsufficientCandidates {
        required: usize,
        found: usize,
        min_kcal: f64,
        max_kcal: f64,
    },

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl PlanError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "user", id }
    }

    pub fn goal_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "goal", id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PlanError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlanError::InvalidGoal(_) | PlanError::InvalidProfile(_) | PlanError::InvalidRecipe(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PlanError::InsufficientCandidates { .. } | PlanError::Conflict(_) => StatusCode::CONFLICT,
            PlanError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            PlanError::Storage(e) => {
                error!(error = %e, "storage failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}
