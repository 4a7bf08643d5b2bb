use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::NewGoal, repo, repo_types::Goal};
use crate::{errors::PlanError, state::AppState, users};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", post(create_goal))
        .route("/goals/:id", get(get_goal))
}

#[instrument(skip(state, body), fields(user_id = %body.user_id))]
pub async fn create_goal(
    State(state): State<AppState>,
    Json(body): Json<NewGoal>,
) -> Result<(StatusCode, HeaderMap, Json<Goal>), PlanError> {
    let body = body.normalize()?;
    if users::repo::find_by_id(&state.db, body.user_id).await?.is_none() {
        return Err(PlanError::user_not_found(body.user_id));
    }

    let goal = repo::insert(&state.db, &body).await?;
    info!(goal_id = %goal.id, meals_per_day = goal.meals_per_day, "goal created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/goals/{}", goal.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(goal)))
}

#[instrument(skip(state))]
pub async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Goal>, PlanError> {
    repo::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| PlanError::goal_not_found(id))
}
