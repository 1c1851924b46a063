use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::database::models::{BlogPost, BlogPostFields, BlogPostSummary, CalendarEvent, CalendarEventFields, User};
use crate::database::pool::DatabaseError;
use crate::database::repository::{BlogPostRepository, CalendarEventRepository, Upsert, UserRepository};

/// Process-local store implementing every repository trait.
///
/// Backs the `--memory` server mode and the test suites. One mutex guards
/// the whole state, which gives detail fetches the same one-at-a-time
/// behaviour the row lock gives them in Postgres.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    posts: BTreeMap<i64, BlogPost>,
    events: BTreeMap<i64, CalendarEvent>,
    users: Vec<User>,
    last_post_id: i64,
    last_event_id: i64,
    last_user_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an admin account. Emails are unique ignoring case; adding a
    /// known email returns the existing account.
    pub async fn add_user(&self, email: &str, name: Option<&str>) -> User {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.users.iter().find(|u| u.email.eq_ignore_ascii_case(email)) {
            return existing.clone();
        }
        state.last_user_id += 1;
        let user = User {
            user_id: state.last_user_id,
            email: email.to_string(),
            name: name.map(str::to_string),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        user
    }
}

fn post_not_found(post_id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("blog post {}", post_id))
}

fn event_not_found(event_id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("calendar event {}", event_id))
}

#[async_trait]
impl BlogPostRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<BlogPostSummary>, DatabaseError> {
        let state = self.state.lock().await;
        Ok(state.posts.values().cloned().map(BlogPostSummary::from).collect())
    }

    async fn get_detail(&self, post_id: i64) -> Result<BlogPost, DatabaseError> {
        let mut state = self.state.lock().await;
        let post = state.posts.get_mut(&post_id).ok_or_else(|| post_not_found(post_id))?;
        post.views += 1;
        Ok(post.clone())
    }

    async fn upsert(&self, request: Upsert<BlogPostFields>) -> Result<BlogPost, DatabaseError> {
        let mut state = self.state.lock().await;
        match request {
            Upsert::Create(fields) => {
                state.last_post_id += 1;
                let post = BlogPost {
                    post_id: state.last_post_id,
                    title: fields.title,
                    content: fields.content,
                    thumbnail: fields.thumbnail,
                    views: 0,
                    creation_date: Utc::now(),
                };
                state.posts.insert(post.post_id, post.clone());
                Ok(post)
            }
            Upsert::Update { id, fields } => {
                let post = state.posts.get_mut(&id).ok_or_else(|| post_not_found(id))?;
                post.title = fields.title;
                post.content = fields.content;
                post.thumbnail = fields.thumbnail;
                Ok(post.clone())
            }
        }
    }

    async fn delete(&self, post_id: i64) -> Result<BlogPost, DatabaseError> {
        let mut state = self.state.lock().await;
        state.posts.remove(&post_id).ok_or_else(|| post_not_found(post_id))
    }
}

#[async_trait]
impl CalendarEventRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<CalendarEvent>, DatabaseError> {
        let state = self.state.lock().await;
        let mut events: Vec<_> = state.events.values().cloned().collect();
        events.sort_by_key(|e| (e.event_date, e.event_id));
        Ok(events)
    }

    async fn upsert(&self, request: Upsert<CalendarEventFields>) -> Result<CalendarEvent, DatabaseError> {
        let mut state = self.state.lock().await;
        match request {
            Upsert::Create(fields) => {
                state.last_event_id += 1;
                let event = CalendarEvent {
                    event_id: state.last_event_id,
                    event_title: fields.event_title,
                    event_date: fields.event_date,
                    event_type: fields.event_type,
                    event_text: fields.event_text,
                };
                state.events.insert(event.event_id, event.clone());
                Ok(event)
            }
            Upsert::Update { id, fields } => {
                let event = state.events.get_mut(&id).ok_or_else(|| event_not_found(id))?;
                event.event_title = fields.event_title;
                event.event_date = fields.event_date;
                event.event_type = fields.event_type;
                event.event_text = fields.event_text;
                Ok(event.clone())
            }
        }
    }

    async fn delete(&self, event_id: i64) -> Result<CalendarEvent, DatabaseError> {
        let mut state = self.state.lock().await;
        state.events.remove(&event_id).ok_or_else(|| event_not_found(event_id))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }
}
