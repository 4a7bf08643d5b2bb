use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{dto::NewUser, repo, repo_types::User};
use crate::{errors::PlanError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, HeaderMap, Json<User>), PlanError> {
    let body = body.normalize()?;

    if repo::find_by_email(&state.db, &body.email).await?.is_some() {
        warn!(email = %body.email, "email already registered");
        return Err(PlanError::Conflict("email already registered".into()));
    }

    let user = repo::insert(&state.db, &body).await?;
    info!(user_id = %user.id, "user created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/users/{}", user.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, PlanError> {
    repo::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| PlanError::user_not_found(id))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;
    use crate::store::test_pool;

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let Some(db) = test_pool().await else { return };
        let state = AppState::for_pool(db);
        let body = || NewUser {
            name: "Linus".into(),
            email: format!("dup-{}@example.com", Uuid::new_v4()),
            height_cm: 180.0,
            weight_kg: 80.0,
            age: 30,
            is_male: true,
        };
        let first = body();
        let second = NewUser {
            email: first.email.to_uppercase(),
            ..body()
        };

        let res = create_user(State(state.clone()), Json(first)).await.into_response();
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = create_user(State(state), Json(second)).await.into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
