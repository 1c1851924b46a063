use async_trait::async_trait;

use crate::database::models::User;
use crate::database::pool::{DatabaseError, DatabasePool};
use crate::database::repository::UserRepository;

/// Admin accounts in the `users` table. Rows are provisioned by hand;
/// this service only reads them.
#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: DatabasePool,
}

impl PgUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, name, created_at
             FROM users
             WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        self.pool.release(conn);
        Ok(user)
    }
}
