pub mod blog_admin;
pub mod calendar_admin;
pub mod whoami;

pub use blog_admin::{blog_create, blog_delete, blog_update};
pub use calendar_admin::{calendar_create, calendar_delete, calendar_update, EVENT_NOT_FOUND};
pub use whoami::whoami;
