use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::OAuthError;
use crate::config::OAuthConfig;

/// Google OAuth 2.0 provider: consent-URL construction and authorization-code
/// exchange against Google's token and userinfo endpoints.
#[derive(Clone, Debug)]
pub struct GoogleOAuthProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// Subset of the OpenID userinfo payload this service consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleOAuthProvider {
    pub fn from_config(config: &OAuthConfig) -> Result<Self, OAuthError> {
        let client_id = config
            .google_client_id
            .clone()
            .ok_or_else(|| OAuthError::ConfigError("GOOGLE_CLIENT_ID not set".to_string()))?;
        let client_secret = config
            .google_client_secret
            .clone()
            .ok_or_else(|| OAuthError::ConfigError("GOOGLE_CLIENT_SECRET not set".to_string()))?;
        let redirect_uri = config
            .google_redirect_uri
            .clone()
            .ok_or_else(|| OAuthError::ConfigError("GOOGLE_REDIRECT_URI not set".to_string()))?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            http_client: Client::new(),
        })
    }

    /// Consent-screen URL the login endpoint redirects to.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile&state={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for the user's identity.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleUserInfo, OAuthError> {
        let token_response = self
            .http_client
            .post("https://oauth2.googleapis.com/token")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("HTTP error: {}", e)))?
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("JSON parse error: {}", e)))?;

        let user_info = self
            .http_client
            .get("https://openidconnect.googleapis.com/v1/userinfo")
            .bearer_auth(&token_response.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::UserInfoFetch(format!("HTTP error: {}", e)))?
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| OAuthError::UserInfoFetch(format!("JSON parse error: {}", e)))?;

        Ok(user_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GoogleOAuthProvider {
        GoogleOAuthProvider::from_config(&OAuthConfig {
            google_client_id: Some("client-id".to_string()),
            google_client_secret: Some("client-secret".to_string()),
            google_redirect_uri: Some("http://localhost:8080/auth/google/callback".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn missing_config_is_a_config_error() {
        let err = GoogleOAuthProvider::from_config(&OAuthConfig {
            google_client_id: None,
            google_client_secret: None,
            google_redirect_uri: None,
        })
        .unwrap_err();
        assert!(matches!(err, OAuthError::ConfigError(_)));
    }

    #[test]
    fn authorization_url_encodes_parameters() {
        let url = provider().authorization_url("st/ate");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("state=st%2Fate"));
        assert!(url.contains("scope=openid%20email%20profile"));
    }
}
