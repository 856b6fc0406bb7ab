//! Bearer tokens for catalog writes.
//!
//! Tokens are HS256 JWTs. Only access tokens exist: when one expires the
//! client calls `/api/auth/login` again.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use reel_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Id of the account the token was issued to.
    pub sub: DbId,
    /// Role at issue time. Requests use the stored role instead.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Random per-token id, so two tokens issued in the same second differ.
    pub jti: String,
}

impl Claims {
    fn issue(user_id: DbId, role: &str, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_owned(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the expiry is not a
    /// positive integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .expect("JWT_ACCESS_EXPIRY_MINS must be a positive integer"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn lifetime(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }

    /// Token lifetime in seconds, reported to clients as `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.lifetime().num_seconds()
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Sign a token for `user_id` acting with `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::issue(user_id, role, config.lifetime());
    encode(&Header::default(), &claims, &config.encoding_key())
}

/// Verify signature and expiry, returning the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, &config.decoding_key(), &Validation::default()).map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let config = config("catalog-signing-secret");
        let token = generate_access_token(42, "admin", &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!((claims.sub, claims.role.as_str()), (42, "admin"));
        assert_eq!(claims.exp - claims.iat, config.expires_in_secs());
        assert_eq!(config.expires_in_secs(), 3600);
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let config = config("catalog-signing-secret");
        let a = validate_token(&generate_access_token(1, "user", &config).unwrap(), &config);
        let b = validate_token(&generate_access_token(1, "user", &config).unwrap(), &config);
        assert_ne!(a.unwrap().jti, b.unwrap().jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("catalog-signing-secret");
        // Past the 60 second default leeway.
        let claims = Claims::issue(1, "user", Duration::minutes(-5));
        let token = encode(&Header::default(), &claims, &config.encoding_key()).unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = generate_access_token(1, "user", &config("secret-alpha")).unwrap();
        assert!(validate_token(&token, &config("secret-bravo")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_token("not.a.jwt", &config("secret")).is_err());
    }
}
