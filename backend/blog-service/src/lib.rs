// Blog Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use error::{AppError, Result};

use services::oauth::google::GoogleOAuthProvider;
use services::{PostService, UploadStore, UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub oauth: Option<GoogleOAuthProvider>,
    pub uploads: UploadStore,
}
