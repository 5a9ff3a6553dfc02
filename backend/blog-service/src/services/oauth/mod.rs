pub mod google;

use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth configuration error: {0}")]
    ConfigError(String),
    #[error("OAuth network error: {0}")]
    NetworkError(String),
    #[error("OAuth token exchange failed: {0}")]
    TokenExchange(String),
    #[error("OAuth user info fetch failed: {0}")]
    UserInfoFetch(String),
}

impl From<OAuthError> for AppError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::ConfigError(msg) => AppError::Internal(msg),
            // A failed exchange means the presented code/grant was not
            // acceptable to the provider: an authentication failure.
            OAuthError::TokenExchange(msg) => AppError::Authentication(msg),
            OAuthError::NetworkError(msg) | OAuthError::UserInfoFetch(msg) => {
                AppError::Internal(msg)
            }
        }
    }
}
