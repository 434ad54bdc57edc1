use crate::auth::repo_types::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Advisory lock key held while a user row is inserted.
const REGISTRATION_LOCK: i64 = 0x6174_7465_6e64_6c79;

impl User {
    /// Find a user by login name.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. The very first user becomes admin.
    ///
    /// Registrations serialize on a transaction-scoped advisory lock so two
    /// concurrent first sign-ups cannot both see an empty table.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let mut tx = db.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(REGISTRATION_LOCK)
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, is_admin)
            VALUES ($1, $2, $3, NOT EXISTS (SELECT 1 FROM users))
            RETURNING id, username, email, password_hash, is_admin, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }
}

/// True when the error comes from a UNIQUE constraint (e.g. a concurrent registration).
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Needs a migrated database in `DATABASE_URL`.
    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn concurrent_registrations_produce_at_most_one_admin() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
        let db = PgPool::connect(&url).await.unwrap();
        crate::store::run_migrations(&db).await.unwrap();

        let run = Uuid::new_v4().simple().to_string();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = db.clone();
                let name = format!("u{i}_{}", &run[..12]);
                tokio::spawn(async move {
                    User::create(&db, &name, &format!("{name}@example.com"), "$argon2id$x").await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(admins, 1);
    }
}
