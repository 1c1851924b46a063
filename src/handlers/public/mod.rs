pub mod auth;
pub mod blog;
pub mod calendar;
pub mod system;

pub use auth::verify_google_id_token;
pub use blog::{blog_detail, blog_list, POST_NOT_FOUND};
pub use calendar::calendar_list;
pub use system::{health, root};
