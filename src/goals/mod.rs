pub mod dto;
mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

pub fn router() -> Router<AppState> {
    handlers::goal_routes()
}
