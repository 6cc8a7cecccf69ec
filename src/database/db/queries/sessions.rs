// Read side of the external auth service's tables, plus the dev helper that
// issues a token without it.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::convert::{time_to_db, uuid_from_db};

/// Owner of a live session token, if any.
pub async fn find_session_user(
    pool: &Pool<Sqlite>,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Uuid>, sqlx::Error> {
    let user_id: Option<String> = sqlx::query_scalar(
        r#"
        SELECT user_id
        FROM sessions
        WHERE token = ? AND (expires_at IS NULL OR expires_at > ?)
        "#,
    )
    .bind(token)
    .bind(time_to_db(now))
    .fetch_optional(pool)
    .await?;

    user_id.as_deref().map(uuid_from_db).transpose()
}

pub async fn find_or_create_user(
    pool: &Pool<Sqlite>,
    email: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, sqlx::Error> {
    let existing: Option<String> = sqlx::query_scalar("SELECT user_id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if let Some(user_id) = existing {
        return uuid_from_db(&user_id);
    }

    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (user_id, name, email, created_at) VALUES (?, ?, ?, ?)")
        .bind(user_id.to_string())
        .bind(name)
        .bind(email)
        .bind(time_to_db(now))
        .execute(pool)
        .await?;

    Ok(user_id)
}

pub async fn create_session(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<String, sqlx::Error> {
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
        .bind(&token)
        .bind(user_id.to_string())
        .bind(expires_at.map(time_to_db))
        .bind(time_to_db(now))
        .execute(pool)
        .await?;

    Ok(token)
}
