use async_trait::async_trait;

use crate::database::models::{BlogPost, BlogPostFields, BlogPostSummary, CalendarEvent, CalendarEventFields, User};
use crate::database::pool::DatabaseError;

/// Create-or-update request. The id only ever comes from `Update`, so an id
/// of 0 is a normal update target rather than "no id".
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert<F> {
    Create(F),
    Update { id: i64, fields: F },
}

impl<F> Upsert<F> {
    pub fn from_optional_id(id: Option<i64>, fields: F) -> Self {
        match id {
            Some(id) => Upsert::Update { id, fields },
            None => Upsert::Create(fields),
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Upsert::Create(_))
    }
}

#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// Every post without its body, oldest first
    async fn list_all(&self) -> Result<Vec<BlogPostSummary>, DatabaseError>;

    /// Read one post and count the view. The returned row already carries the
    /// incremented `views`.
    async fn get_detail(&self, post_id: i64) -> Result<BlogPost, DatabaseError>;

    async fn upsert(&self, request: Upsert<BlogPostFields>) -> Result<BlogPost, DatabaseError>;

    /// Remove a post, returning the row as it was before the delete
    async fn delete(&self, post_id: i64) -> Result<BlogPost, DatabaseError>;
}

#[async_trait]
pub trait CalendarEventRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<CalendarEvent>, DatabaseError>;

    async fn upsert(&self, request: Upsert<CalendarEventFields>) -> Result<CalendarEvent, DatabaseError>;

    async fn delete(&self, event_id: i64) -> Result<CalendarEvent, DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_valid_update_id() {
        let upsert = Upsert::from_optional_id(Some(0), ());
        assert_eq!(upsert, Upsert::Update { id: 0, fields: () });
        assert!(!upsert.is_create());
    }

    #[test]
    fn missing_id_creates() {
        assert!(Upsert::from_optional_id(None, ()).is_create());
    }
}
