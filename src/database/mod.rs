pub mod blog_posts;
pub mod calendar_events;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repository;
pub mod users;

pub use blog_posts::PgBlogPostRepository;
pub use calendar_events::PgCalendarEventRepository;
pub use memory::MemoryStore;
pub use pool::{DatabaseError, DatabasePool};
pub use repository::{BlogPostRepository, CalendarEventRepository, Upsert, UserRepository};
pub use users::PgUserRepository;
