use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{dto::NewUser, repo_types::User};

/// Find a user by id.
pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, height_cm, weight_kg, age, is_male, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find user by id")?;
    Ok(user)
}

/// Find a user by email.
pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, height_cm, weight_kg, age, is_male, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
    .context("find user by email")?;
    Ok(user)
}

/// Create a user from an already normalized body.
pub async fn insert(db: &PgPool, user: &NewUser) -> anyhow::Result<User> {
    let row = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, height_cm, weight_kg, age, is_male)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, email, height_cm, weight_kg, age, is_male, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.height_cm)
    .bind(user.weight_kg)
    .bind(user.age)
    .bind(user.is_male)
    .fetch_one(db)
    .await
    .context("insert user")?;
    Ok(row)
}
