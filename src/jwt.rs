//! JWT encoding and decoding of signed claims.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Claims carried inside every signed token.
///
/// The field names on the wire (`userID`, `iat`, `exp`) are part of the
/// token format and must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identifier of the authenticated principal. Always > 0 for minted tokens.
    #[serde(rename = "userID")]
    pub user_id: i64,
    /// Issued at (Unix seconds)
    pub iat: u64,
    /// Expiration time (Unix seconds)
    pub exp: u64,
}

/// Signing and verification keys for the process-wide shared secret.
///
/// Constructed once at startup and injected into the token service; rotating
/// the secret invalidates every previously issued token.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Sign claims into a compact token string. Deterministic for identical
    /// claims and secret.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(JwtError::Encoding)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// Only HS256 is accepted; tokens with `alg: none` or any other
    /// algorithm fail with [`JwtError::InvalidSignature`].
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    JwtError::InvalidSignature
                }
                _ => JwtError::Malformed,
            })?;

        Ok(token_data.claims)
    }
}

/// Current time as Unix seconds.
pub fn unix_now() -> Result<u64, JwtError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| JwtError::TimeError)
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Token string is not well-formed (wrong segment count, bad encoding)
    Malformed,
    /// Signature does not verify against the configured secret or algorithm
    InvalidSignature,
    /// Current time exceeds the token's expiry
    Expired,
    /// Error signing the claims
    Encoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Malformed => write!(f, "Malformed token"),
            JwtError::InvalidSignature => write!(f, "Invalid token signature"),
            JwtError::Expired => write!(f, "Token expired"),
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}
