use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{dto::NewGoal, repo_types::Goal};

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Goal>> {
    let goal = sqlx::query_as::<_, Goal>(
        r#"
        SELECT id, user_id, desired_weight_kg, activity_level, meals_per_day,
               start_date, end_date
        FROM goals
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find goal by id")?;
    Ok(goal)
}

pub async fn insert(db: &PgPool, goal: &NewGoal) -> anyhow::Result<Goal> {
    let row = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (id, user_id, desired_weight_kg, activity_level, meals_per_day,
                           start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, desired_weight_kg, activity_level, meals_per_day,
                  start_date, end_date
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(goal.user_id)
    .bind(goal.desired_weight_kg)
    .bind(&goal.activity_level)
    .bind(goal.meals_per_day)
    .bind(goal.start_date)
    .bind(goal.end_date)
    .fetch_one(db)
    .await
    .context("insert goal")?;
    Ok(row)
}
