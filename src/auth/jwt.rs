use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{DbId, Role};

use super::AuthError;

/// Claims carried by every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: DbId,
    pub role: Role,
    /// Filière of the user; admins have none
    pub filiere: Option<DbId>,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn with_expiry(user_id: DbId, role: Role, filiere: Option<DbId>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            role,
            filiere,
            exp,
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

pub fn generate_jwt_with_secret(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt_with_secret(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(e.to_string()),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trips_claims() {
        let claims = Claims::with_expiry(42, Role::Professor, Some(3), 24);
        let token = generate_jwt_with_secret(&claims, SECRET).unwrap();
        let decoded = validate_jwt_with_secret(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.role, Role::Professor);
        assert_eq!(decoded.filiere, Some(3));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = generate_jwt_with_secret(&Claims::with_expiry(1, Role::Admin, None, 24), SECRET).unwrap();
        assert!(matches!(validate_jwt_with_secret(&token, "other"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = Claims::with_expiry(1, Role::Student, Some(1), 24);
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt_with_secret(&claims, SECRET).unwrap();
        assert!(matches!(validate_jwt_with_secret(&token, SECRET), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = Claims::with_expiry(1, Role::Student, Some(1), 24);
        assert!(matches!(generate_jwt_with_secret(&claims, ""), Err(AuthError::InvalidSecret)));
    }
}
