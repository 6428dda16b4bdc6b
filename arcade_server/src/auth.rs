//! Bearer-token authentication.
//!
//! Access tokens are two base64url segments, `payload.signature`, where the payload is the JSON-encoded
//! [`JwtClaims`] and the signature is an HMAC-SHA256 over the encoded payload using the server's signing secret.
//! Tokens are self-contained; there is no session store and tokens cannot be revoked before they expire.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use base64::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use nas_common::Secret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i64,
    pub roles: Vec<Role>,
    /// Unix timestamp after which the token is no longer accepted.
    pub exp: i64,
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServerError::InsufficientPermissions("This endpoint requires the Admin role.".to_string()))
        }
    }
}

/// Extracting [`JwtClaims`] from a request validates the `Authorization: Bearer` header against the
/// [`TokenIssuer`] registered in the app data. Handlers that take a `JwtClaims` argument are therefore only
/// invoked for authenticated callers.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::InitializeError("No TokenIssuer is registered with the server.".to_string()))?;
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token.".to_string()))?;
    Ok(issuer.validate_token(token.trim())?)
}

/// Issues and validates access tokens. One instance is shared across all workers via app data.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Secret<String>,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { secret: config.jwt_secret.clone() }
    }

    /// Issue a new access token for the given user.
    /// This method DOES NOT verify that the caller is entitled to the requested roles.
    /// This must be done prior to calling `issue_token`.
    pub fn issue_token(&self, user_id: i64, roles: Vec<Role>, duration: Option<Duration>) -> String {
        let duration = duration.unwrap_or_else(|| Duration::hours(24));
        let claims = JwtClaims { user_id, roles, exp: (Utc::now() + duration).timestamp() };
        let payload = serde_json::to_vec(&claims).expect("JwtClaims always serializes");
        let payload = base64::encode_config(payload, URL_SAFE_NO_PAD);
        let signature = base64::encode_config(self.sign(payload.as_bytes()), URL_SAFE_NO_PAD);
        format!("{payload}.{signature}")
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| AuthError::PoorlyFormattedToken("The token has no signature segment.".to_string()))?;
        let signature = base64::decode_config(signature, URL_SAFE_NO_PAD)
            .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        // Constant-time comparison via the Mac verifier.
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|e| AuthError::ValidationError(e.to_string()))?;
        let payload =
            base64::decode_config(payload, URL_SAFE_NO_PAD).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let claims = serde_json::from_slice::<JwtClaims>(&payload)
            .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        if claims.exp < Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.reveal().as_bytes()).expect("HMAC accepts keys of any length")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig { jwt_secret: Secret::new("a-test-signing-secret-of-decent-length".to_string()) })
    }

    #[test]
    fn round_trip() {
        let token = issuer().issue_token(42, vec![Role::User], None);
        let claims = issuer().validate_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.roles, vec![Role::User]);
        assert!(!claims.is_admin());
    }

    #[test]
    fn tampered_payloads_are_rejected() {
        let token = issuer().issue_token(42, vec![Role::User], None);
        let forged = issuer().issue_token(43, vec![Role::Admin], None);
        // Graft the forged payload onto the original signature.
        let tampered = format!("{}.{}", forged.split('.').next().unwrap(), token.split('.').nth(1).unwrap());
        let err = issuer().validate_token(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));
    }

    #[test]
    fn foreign_secrets_are_rejected() {
        let other =
            TokenIssuer::new(&AuthConfig { jwt_secret: Secret::new("a-different-secret-of-decent-length!".to_string()) });
        let token = other.issue_token(1, vec![Role::Admin], None);
        let err = issuer().validate_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = issuer().issue_token(1, vec![Role::User], Some(Duration::seconds(-5)));
        let err = issuer().validate_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(issuer().validate_token("not-a-token").unwrap_err(), AuthError::PoorlyFormattedToken(_)));
        assert!(matches!(issuer().validate_token("abc.!!!").unwrap_err(), AuthError::PoorlyFormattedToken(_)));
    }

    #[test]
    fn admin_check() {
        let token = issuer().issue_token(7, vec![Role::User, Role::Admin], None);
        let claims = issuer().validate_token(&token).unwrap();
        assert!(claims.require_admin().is_ok());
        let token = issuer().issue_token(7, vec![Role::User], None);
        let claims = issuer().validate_token(&token).unwrap();
        assert!(claims.require_admin().is_err());
    }
}
