mod app;
mod config;
mod errors;
mod goals;
mod meal_plans;
mod nutrition;
mod recipes;
mod state;
mod store;
mod users;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutriplan=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    tracing::info!(
        formula = ?app_state.config.planner.calorie_formula,
        recipes_per_meal = app_state.config.planner.recipes_per_meal,
        calorie_window = app_state.config.planner.calorie_window,
        "planner configured"
    );

    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    let addr = app_state.config.listen_addr()?;
    app::serve(app::build_app(app_state), addr).await
}
