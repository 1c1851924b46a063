pub mod blog_post;
pub mod calendar_event;
pub mod user;

pub use blog_post::{BlogPost, BlogPostFields, BlogPostSummary};
pub use calendar_event::{normalize_event_date, CalendarEvent, CalendarEventFields, EventDateError};
pub use user::User;
