use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{GenerateRequest, PlanSummary},
    repo_types::PlanEntryView,
};
use crate::{errors::PlanError, state::AppState};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans/generate", post(generate_plan))
        .route("/meal-plans/:user_id", get(get_plan))
}

#[instrument(skip(state))]
pub async fn generate_plan(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<PlanSummary>, PlanError> {
    let summary = state.planner.generate(req.user_id, req.goal_id).await?;
    info!(
        user_id = %summary.user_id,
        goal_id = %summary.goal_id,
        daily_calories = summary.daily_calories,
        "meal plan generated"
    );
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PlanEntryView>>, PlanError> {
    Ok(Json(state.planner.plan_for_user(user_id).await?))
}
