use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{dto::NewRecipe, repo_types::Recipe};

/// Recipes whose calories fall inside `[min_kcal, max_kcal]`, in insertion order.
pub async fn find_by_calorie_range(
    db: &PgPool,
    min_kcal: f64,
    max_kcal: f64,
    limit: i64,
) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, title, category, calories, protein_g, carbs_g, fat_g, created_at
          FROM recipes
         WHERE calories BETWEEN $1 AND $2
         ORDER BY created_at ASC, id ASC
         LIMIT $3
        "#,
    )
    .bind(min_kcal)
    .bind(max_kcal)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("find recipes by calorie range")?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let row = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, title, category, calories, protein_g, carbs_g, fat_g, created_at
          FROM recipes
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find recipe by id")?;
    Ok(row)
}

/// Insert a recipe. The column list is fixed; callers cannot name columns.
pub async fn insert(db: &PgPool, recipe: &NewRecipe) -> anyhow::Result<Recipe> {
    let row = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (id, title, category, calories, protein_g, carbs_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, title, category, calories, protein_g, carbs_g, fat_g, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(recipe.title.trim())
    .bind(recipe.category.as_deref())
    .bind(recipe.calories)
    .bind(recipe.protein_g)
    .bind(recipe.carbs_g)
    .bind(recipe.fat_g)
    .fetch_one(db)
    .await
    .context("insert recipe")?;
    Ok(row)
}
