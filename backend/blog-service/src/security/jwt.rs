use anyhow::{anyhow, Result};
/// JWT session tokens signed with the server secret (HS256).
/// Tokens carry minimal claims and expire after one hour; there is no
/// refresh mechanism, clients re-authenticate after expiry.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_EXPIRY_HOURS: i64 = 1;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

lazy_static! {
    static ref JWT_KEYS: std::sync::RwLock<Option<(EncodingKey, DecodingKey)>> =
        std::sync::RwLock::new(None);
}

/// Initialize the signing secret. Must be called during application startup
/// before any token operation; an unusable secret is a startup failure, never
/// a per-request one.
pub fn initialize_secret(secret: &str) -> Result<()> {
    if secret.trim().is_empty() {
        return Err(anyhow!("JWT secret must not be empty"));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut keys = JWT_KEYS
        .write()
        .map_err(|e| anyhow!("Failed to acquire write lock on JWT keys: {}", e))?;
    *keys = Some((encoding_key, decoding_key));

    Ok(())
}

fn get_encoding_key() -> Result<EncodingKey> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock on JWT keys: {}", e))?;

    keys.as_ref()
        .map(|(enc, _)| enc.clone())
        .ok_or_else(|| anyhow!("JWT secret not initialized. Call initialize_secret() during startup"))
}

fn get_decoding_key() -> Result<DecodingKey> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock on JWT keys: {}", e))?;

    keys.as_ref()
        .map(|(_, dec)| dec.clone())
        .ok_or_else(|| anyhow!("JWT secret not initialized. Call initialize_secret() during startup"))
}

/// Generate a session token for an authenticated identity.
pub fn generate_token(user_id: Uuid, name: &str) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id.to_string(),
        name: name.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| anyhow!("Failed to generate token: {}", e))
}

/// Validate and decode a token.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| anyhow!("Token validation failed: {}", e))
}
