pub mod post;
pub mod user;

pub use post::{apply_update, EditEntry, FieldChange, NewPost, Post, PostChanges, TRACKED_FIELDS};
pub use user::{NewUser, User, UserChanges, UserProfile};
