//! Supabase access token validation
//!
//! Supabase signs member access tokens with the project's JWT secret
//! (HS256). Keys are pre-computed once and shared through `AppState`.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Role stored in `app_metadata` for administrators
pub const ADMIN_ROLE: &str = "admin";

/// Server-controlled metadata Supabase embeds in the token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Supabase JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (auth user ID)
    pub sub: String,
    /// Audience, "authenticated" for signed-in members
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postgres role the token maps to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.app_metadata.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Pre-computed JWT keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    audience: String,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            audience: audience.to_string(),
        }
    }

    /// Validate a token and return claims
    #[inline]
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Issue a token shaped like a Supabase access token
    ///
    /// Used by tests and local tooling; members obtain real tokens from Supabase.
    pub fn issue_token(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        admin: bool,
        expiry_secs: i64,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            aud: self.audience.clone(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            email: email.map(str::to_string),
            role: Some("authenticated".to_string()),
            app_metadata: AppMetadata {
                role: admin.then(|| ADMIN_ROLE.to_string()),
                provider: Some("email".to_string()),
            },
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", "authenticated")
    }

    #[test]
    fn test_issue_and_validate_member_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service
            .issue_token(user_id, Some("lid@toptiermen.eu"), false, 3600)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email.as_deref(), Some("lid@toptiermen.eu"));
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_admin_role_read_from_app_metadata() {
        let service = create_test_service();
        let token = service.issue_token(Uuid::new_v4(), None, true, 3600).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert!(claims.is_admin());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let issuer = JwtService::new("test-secret", "anon");
        let verifier = create_test_service();
        let token = issuer.issue_token(Uuid::new_v4(), None, false, 3600).unwrap();

        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new("other-secret", "authenticated");
        let token = issuer.issue_token(Uuid::new_v4(), None, false, 3600).unwrap();

        assert!(create_test_service().validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let token = service.issue_token(Uuid::new_v4(), None, false, -3600).unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_claims_without_metadata_deserialize() {
        let json = r#"{"sub":"abc","aud":"authenticated","exp":1,"iat":0}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.app_metadata, AppMetadata::default());
        assert!(!claims.is_admin());
    }
}
