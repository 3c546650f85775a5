//! Community board command and query handlers.

mod create_post;
mod list_posts;
mod watch_posts;

pub use create_post::PostSubmission;
pub use list_posts::ListPostsHandler;
pub use watch_posts::WatchPostsHandler;
