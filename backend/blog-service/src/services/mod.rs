pub mod oauth;
pub mod posts;
pub mod storage;
pub mod users;

pub use posts::{CreatePostData, PostService};
pub use storage::UploadStore;
pub use users::{RegisterData, UpdateUserData, UserService};
