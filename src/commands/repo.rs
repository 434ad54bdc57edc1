use anyhow::Context;
use sqlx::PgPool;

use crate::commands::repo_types::NewCommandLog;

pub async fn append_log(db: &PgPool, entry: &NewCommandLog) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO command_logs (user_id, command_text, intent, response, success)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(entry.user_id)
    .bind(&entry.command_text)
    .bind(entry.intent)
    .bind(&entry.response)
    .bind(entry.success)
    .execute(db)
    .await
    .context("insert command log")?;
    Ok(())
}
