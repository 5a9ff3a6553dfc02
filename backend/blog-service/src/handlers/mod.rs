pub mod auth;
pub mod health;
pub mod posts;
pub mod uploads;
pub mod users;

pub use auth::{authenticate, google_callback, google_login, register};
pub use health::health_check;
pub use posts::{create_post, delete_post, get_edit_history, get_post, list_posts, update_post};
pub use uploads::serve_upload;
pub use users::{current_user_profile, delete_user, get_user_profile, list_users, update_current_user};
