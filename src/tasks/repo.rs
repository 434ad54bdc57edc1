use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::tasks::repo_types::{NewTask, Task, TaskChanges};

impl Task {
    pub async fn create(db: &PgPool, new: &NewTask) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, status, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, status, priority,
                      created_at, updated_at, due_date
            "#,
        )
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.status)
        .bind(new.priority)
        .bind(new.due_date)
        .fetch_one(db)
        .await
        .context("insert task")?;
        Ok(task)
    }

    pub async fn find_by_id(db: &PgPool, task_id: Uuid) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority,
                   created_at, updated_at, due_date
              FROM tasks
             WHERE id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(db)
        .await
        .context("find task")?;
        Ok(task)
    }

    /// Newest first.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority,
                   created_at, updated_at, due_date
              FROM tasks
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list tasks")?;
        Ok(rows)
    }

    /// `None` if no row has that id.
    pub async fn update(
        db: &PgPool,
        task_id: Uuid,
        changes: &TaskChanges,
    ) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
               SET title       = COALESCE($2, title),
                   description = COALESCE($3, description),
                   status      = COALESCE($4, status),
                   priority    = COALESCE($5, priority),
                   due_date    = COALESCE($6, due_date),
                   updated_at  = now()
             WHERE id = $1
            RETURNING id, user_id, title, description, status, priority,
                      created_at, updated_at, due_date
            "#,
        )
        .bind(task_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.due_date)
        .fetch_optional(db)
        .await
        .context("update task")?;
        Ok(task)
    }

    pub async fn delete(db: &PgPool, task_id: Uuid) -> anyhow::Result<bool> {
        let done = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(db)
            .await
            .context("delete task")?;
        Ok(done.rows_affected() == 1)
    }
}
