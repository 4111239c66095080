//! Token pair lifecycle: issuance, verification and refresh.
//!
//! Access tokens are short-lived (10 minutes); refresh tokens are longer
//! lived (100 minutes) and exist solely to mint a new pair without
//! re-entering credentials. Neither is tracked server-side: possession of a
//! valid, unexpired refresh token is sufficient to refresh.

use serde::{Deserialize, Serialize};

use crate::jwt::{Claims, JwtConfig, JwtError, unix_now};

/// Access token lifespan: 600 seconds.
pub const ACCESS_TOKEN_LIFESPAN_SECS: u64 = 600;

/// Refresh token lifespan: 6000 seconds.
pub const REFRESH_TOKEN_LIFESPAN_SECS: u64 = 6000;

/// A freshly minted access/refresh token pair.
///
/// `expires_in` is the Unix timestamp at which the access token expires.
/// Created atomically, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

/// Errors surfaced by the token service.
///
/// Decode failures are collapsed into [`TokenError::Rejected`] so callers
/// cannot distinguish a bad signature from a malformed token.
#[derive(Debug)]
pub enum TokenError {
    /// Token failed verification (malformed, bad signature, or expired
    /// refresh token). Terminal; the caller must re-authenticate.
    Rejected,
    /// Access token has expired
    Expired,
    /// Subject identifier is not a valid principal
    InvalidSubject,
    /// Signing failed (secret unavailable or clock failure)
    SigningFailure,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Rejected => write!(f, "Token rejected"),
            TokenError::Expired => write!(f, "Token expired"),
            TokenError::InvalidSubject => write!(f, "Invalid subject"),
            TokenError::SigningFailure => write!(f, "Token signing failed"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues, verifies and refreshes token pairs against a single [`JwtConfig`].
#[derive(Clone)]
pub struct TokenService {
    jwt: JwtConfig,
}

impl TokenService {
    pub fn new(jwt: JwtConfig) -> Self {
        Self { jwt }
    }

    /// Mint a new access/refresh pair for a subject. Both tokens share the
    /// same `iat` and subject; only the lifespans differ.
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, TokenError> {
        if user_id <= 0 {
            return Err(TokenError::InvalidSubject);
        }

        let now = unix_now().map_err(|_| TokenError::SigningFailure)?;
        let access_expires = now + ACCESS_TOKEN_LIFESPAN_SECS;

        let access = self
            .jwt
            .encode(&Claims {
                user_id,
                iat: now,
                exp: access_expires,
            })
            .map_err(|_| TokenError::SigningFailure)?;

        let refresh = self
            .jwt
            .encode(&Claims {
                user_id,
                iat: now,
                exp: now + REFRESH_TOKEN_LIFESPAN_SECS,
            })
            .map_err(|_| TokenError::SigningFailure)?;

        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
            expires_in: access_expires,
        })
    }

    /// Verify an access token and return the subject it was minted for.
    pub fn verify_access(&self, token: &str) -> Result<i64, TokenError> {
        let claims = self.jwt.decode(token).map_err(|e| match e {
            JwtError::Expired => TokenError::Expired,
            _ => TokenError::Rejected,
        })?;
        Ok(claims.user_id)
    }

    /// Exchange a valid refresh token for a brand-new pair.
    ///
    /// Any decode failure is terminal: the caller must log in again.
    pub fn refresh_pair(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = self
            .jwt
            .decode(refresh_token)
            .map_err(|_| TokenError::Rejected)?;

        tracing::debug!(user_id = claims.user_id, "Refreshing token pair");

        self.issue_pair(claims.user_id)
    }
}
