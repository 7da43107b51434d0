// Member bearer tokens
// HS256-signed, subject = member id, 8 hour lifetime

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const TOKEN_LIFETIME_HOURS: i64 = 8;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),
}

/// Claims identifying the calling member
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Member ID
    pub sub: Uuid,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

impl Claims {
    fn for_member(member_id: Uuid) -> Self {
        let expiry = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS);
        Self {
            sub: member_id,
            exp: expiry.timestamp() as usize,
        }
    }
}

/// Signs a token for `member_id`
///
/// # Example
/// ```
/// use teamspace_api::auth::jwt::{create_token, verify_token};
/// use uuid::Uuid;
///
/// let member_id = Uuid::new_v4();
/// let token = create_token(member_id, "secret").expect("valid token");
///
/// assert_eq!(verify_token(&token, "secret").unwrap().sub, member_id);
/// ```
pub fn create_token(member_id: Uuid, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        &Claims::for_member(member_id),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Checks signature and expiry and returns the claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::Rejected)
}
