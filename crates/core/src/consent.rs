/// The Consent Gate: validates a signed consent token against an expected
/// scope and user identity before any privileged operation.
///
/// Tokens are compact HS256 JWTs carrying a `scope` and `uid` private claim
/// alongside the standard `exp`. The gate owns decoding; callers pass the
/// token around as an opaque string (per §6, "the core treats it as a
/// black-box string").
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentClaims {
    /// User id (subject).
    pub uid: String,
    /// Consent scope, e.g. `vault.read.email` or `knowledge.base.read`.
    pub scope: String,
    /// Standard expiry claim, seconds since epoch.
    pub exp: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsentError {
    #[error("token signature does not verify")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token scope does not match the expected scope")]
    ScopeMismatch,
    #[error("token user does not match the expected user")]
    UserMismatch,
}

/// Validates consent tokens against a single HMAC secret.
#[derive(Clone)]
pub struct ConsentGate {
    hmac_secret: String,
}

impl ConsentGate {
    pub fn new(hmac_secret: impl Into<String>) -> Self {
        Self {
            hmac_secret: hmac_secret.into(),
        }
    }

    /// `validate(token, expected_scope, expected_user) -> (ok, reason, parsed)`
    /// modeled as a `Result<ConsentClaims, ConsentError>`: `Ok` is the "ok"
    /// case with `parsed` attached, `Err` carries the reason.
    pub fn validate(
        &self,
        token: &str,
        expected_scope: &str,
        expected_user: &str,
    ) -> Result<ConsentClaims, ConsentError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims = Default::default();

        let decoded = decode::<ConsentClaims>(
            token,
            &DecodingKey::from_secret(self.hmac_secret.as_bytes()),
            &validation,
        )
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ConsentError::Expired,
            _ => ConsentError::InvalidSignature,
        })?;

        let claims = decoded.claims;
        if claims.scope != expected_scope {
            return Err(ConsentError::ScopeMismatch);
        }
        if claims.uid != expected_user {
            return Err(ConsentError::UserMismatch);
        }
        Ok(claims)
    }

    /// Issues a token. Used by tests and the CLI demo; no production code
    /// path in this crate issues its own consent tokens (the HTTP layer
    /// collaborator does that).
    pub fn issue(&self, user_id: &str, scope: &str, ttl_secs: i64) -> String {
        let exp = (chrono::Utc::now() + chrono::Duration::seconds(ttl_secs)).timestamp() as usize;
        let claims = ConsentClaims {
            uid: user_id.to_string(),
            scope: scope.to_string(),
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.hmac_secret.as_bytes()),
        )
        .expect("HS256 encoding with a well-formed secret never fails")
    }
}
