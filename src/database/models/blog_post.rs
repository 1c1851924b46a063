use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full blog post row, as returned by the detail, upsert and delete paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BlogPost {
    pub post_id: i64,
    pub title: String,
    pub content: String,
    pub thumbnail: Option<String>,
    pub views: i64,
    pub creation_date: DateTime<Utc>,
}

/// List view of a post; the body is left out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BlogPostSummary {
    pub post_id: i64,
    pub title: String,
    pub thumbnail: Option<String>,
    pub views: i64,
    pub creation_date: DateTime<Utc>,
}

/// Writable columns of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostFields {
    pub title: String,
    pub content: String,
    pub thumbnail: Option<String>,
}

impl From<BlogPost> for BlogPostSummary {
    fn from(post: BlogPost) -> Self {
        Self {
            post_id: post.post_id,
            title: post.title,
            thumbnail: post.thumbnail,
            views: post.views,
            creation_date: post.creation_date,
        }
    }
}
