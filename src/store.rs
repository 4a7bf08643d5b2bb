use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    goals::{self, repo_types::Goal},
    meal_plans::{
        self,
        repo_types::{NewPlanEntry, PlanEntryView},
    },
    recipes::{self, repo_types::Recipe},
    users::{self, repo_types::User},
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn find_goal_by_id(&self, id: Uuid) -> anyhow::Result<Option<Goal>>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// At most `limit` recipes with calories in `[min_kcal, max_kcal]`, in stable storage order.
    async fn find_recipes_by_calorie_range(
        &self,
        min_kcal: f64,
        max_kcal: f64,
        limit: i64,
    ) -> anyhow::Result<Vec<Recipe>>;
}

#[async_trait]
pub trait MealPlanStore: Send + Sync {
    /// Delete-then-insert as one unit: either the new plan is fully stored or the old one stays.
    async fn replace_meal_plan(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        entries: &[NewPlanEntry],
    ) -> anyhow::Result<()>;

    async fn list_plan_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<PlanEntryView>>;
}

/// Postgres-backed implementation of every store seam.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        users::repo::find_by_id(&self.db, id).await
    }
}

#[async_trait]
impl GoalStore for PgStore {
    async fn find_goal_by_id(&self, id: Uuid) -> anyhow::Result<Option<Goal>> {
        goals::repo::find_by_id(&self.db, id).await
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn find_recipes_by_calorie_range(
        &self,
        min_kcal: f64,
        max_kcal: f64,
        limit: i64,
    ) -> anyhow::Result<Vec<Recipe>> {
        recipes::repo::find_by_calorie_range(&self.db, min_kcal, max_kcal, limit).await
    }
}

#[async_trait]
impl MealPlanStore for PgStore {
    async fn replace_meal_plan(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        entries: &[NewPlanEntry],
    ) -> anyhow::Result<()> {
        let deleted = meal_plans::repo::replace_for_goal(&self.db, user_id, goal_id, entries).await?;
        tracing::debug!(%user_id, %goal_id, deleted, inserted = entries.len(), "meal plan replaced");
        Ok(())
    }

    async fn list_plan_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<PlanEntryView>> {
        meal_plans::repo::list_by_user(&self.db, user_id).await
    }
}

/// Pool on `DATABASE_URL` with migrations applied, or `None` when the variable is unset
/// so database tests skip themselves.
#[cfg(test)]
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = sqlx::postgres::PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("run migrations");
    Some(db)
}
