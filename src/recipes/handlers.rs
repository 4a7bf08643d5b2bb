use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::NewRecipe, repo, repo_types::Recipe};
use crate::{errors::PlanError, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/:id", get(get_recipe))
}

#[instrument(skip(state, body), fields(title = %body.title))]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(body): Json<NewRecipe>,
) -> Result<(StatusCode, HeaderMap, Json<Recipe>), PlanError> {
    body.validate()?;
    let recipe = repo::insert(&state.db, &body).await?;
    info!(recipe_id = %recipe.id, calories = recipe.calories, "recipe created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/recipes/{}", recipe.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(recipe)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, PlanError> {
    repo::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or(PlanError::NotFound { entity: "recipe", id })
}
