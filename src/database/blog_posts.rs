use async_trait::async_trait;
use tracing::debug;

use crate::database::models::{BlogPost, BlogPostFields, BlogPostSummary};
use crate::database::pool::{DatabaseError, DatabasePool};
use crate::database::repository::{BlogPostRepository, Upsert};

const POST_COLUMNS: &str = "post_id, title, content, thumbnail, views, creation_date";

/// Blog posts stored in the `blog_posts` table
#[derive(Clone, Debug)]
pub struct PgBlogPostRepository {
    pool: DatabasePool,
}

impl PgBlogPostRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn post_not_found(post_id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("blog post {}", post_id))
}

#[async_trait]
impl BlogPostRepository for PgBlogPostRepository {
    async fn list_all(&self) -> Result<Vec<BlogPostSummary>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let posts = sqlx::query_as::<_, BlogPostSummary>(
            "SELECT post_id, title, thumbnail, views, creation_date
             FROM blog_posts
             ORDER BY post_id",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(posts)
    }

    async fn get_detail(&self, post_id: i64) -> Result<BlogPost, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent readers of the same post until commit
        let locked: Option<(i64,)> = sqlx::query_as("SELECT post_id FROM blog_posts WHERE post_id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Err(post_not_found(post_id));
        }

        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "UPDATE blog_posts SET views = views + 1 WHERE post_id = $1 RETURNING {}",
            POST_COLUMNS
        ))
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(post_id, views = post.views, "Counted blog post view");
        Ok(post)
    }

    async fn upsert(&self, request: Upsert<BlogPostFields>) -> Result<BlogPost, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        match request {
            Upsert::Create(fields) => {
                let post = sqlx::query_as::<_, BlogPost>(&format!(
                    "INSERT INTO blog_posts (title, content, thumbnail) VALUES ($1, $2, $3) RETURNING {}",
                    POST_COLUMNS
                ))
                .bind(&fields.title)
                .bind(&fields.content)
                .bind(&fields.thumbnail)
                .fetch_one(&mut *conn)
                .await?;
                Ok(post)
            }
            Upsert::Update { id, fields } => {
                let post = sqlx::query_as::<_, BlogPost>(&format!(
                    "UPDATE blog_posts SET title = $1, content = $2, thumbnail = $3 WHERE post_id = $4 RETURNING {}",
                    POST_COLUMNS
                ))
                .bind(&fields.title)
                .bind(&fields.content)
                .bind(&fields.thumbnail)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
                post.ok_or_else(|| post_not_found(id))
            }
        }
    }

    async fn delete(&self, post_id: i64) -> Result<BlogPost, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let snapshot = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {} FROM blog_posts WHERE post_id = $1 FOR UPDATE",
            POST_COLUMNS
        ))
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(snapshot) = snapshot else {
            tx.rollback().await?;
            return Err(post_not_found(post_id));
        };

        sqlx::query("DELETE FROM blog_posts WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(snapshot)
    }
}
