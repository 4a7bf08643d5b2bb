use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{NewPlanEntry, PlanEntryView};

/// Atomically swap the stored plan of (user, goal) for `entries`.
///
/// The advisory lock is held until commit or rollback, so two replacements of the
/// same plan run one after the other. Returns the number of rows removed.
pub async fn replace_for_goal(
    db: &PgPool,
    user_id: Uuid,
    goal_id: Uuid,
    entries: &[NewPlanEntry],
) -> anyhow::Result<u64> {
    let mut tx = db.begin().await.context("begin tx")?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("meal_plan:{user_id}:{goal_id}"))
        .execute(&mut *tx)
        .await
        .context("lock meal plan")?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM meal_plan_entries
         WHERE user_id = $1 AND goal_id = $2
        "#,
    )
    .bind(user_id)
    .bind(goal_id)
    .execute(&mut *tx)
    .await
    .context("delete previous meal plan")?
    .rows_affected();

    for entry in entries {
        insert_entry_tx(&mut tx, user_id, goal_id, entry).await?;
    }

    tx.commit().await.context("commit tx")?;
    Ok(deleted)
}

/// Insert a single plan entry within a transaction.
async fn insert_entry_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    goal_id: Uuid,
    entry: &NewPlanEntry,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO meal_plan_entries (id, user_id, goal_id, recipe_id, day, meal_order, slot)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(goal_id)
    .bind(entry.recipe_id)
    .bind(entry.day)
    .bind(entry.meal_order)
    .bind(entry.slot)
    .execute(&mut **tx)
    .await
    .with_context(|| {
        format!(
            "insert meal plan entry day={} meal={} slot={}",
            entry.day, entry.meal_order, entry.slot
        )
    })?;
    Ok(())
}

// ---- Queries ----

/// Every stored entry of a user, all goals, in plan order.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<PlanEntryView>> {
    let rows = sqlx::query_as::<_, PlanEntryView>(
        r#"
        SELECT e.id, e.user_id, e.goal_id, e.recipe_id, e.day, e.meal_order, e.slot,
               r.title AS recipe_title, r.calories
          FROM meal_plan_entries e
          JOIN recipes r ON r.id = e.recipe_id
         WHERE e.user_id = $1
         ORDER BY e.goal_id, e.day, e.meal_order, e.slot
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list meal plan by user")?;
    Ok(rows)
}
