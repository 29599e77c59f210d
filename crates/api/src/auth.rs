// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin authentication.
//!
//! The back office has a single shared password. Logging in exchanges it for
//! a signed, expiring bearer token:
//!
//! ```text
//! v1.<base64url(json {"sub","iat","exp"})>.<base64url(hmac-sha256(payload part))>
//! ```
//!
//! The password itself never appears in a token. Tokens are stateless, so
//! rotating the token secret invalidates every outstanding session.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{info, warn};

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: &str = "v1";

/// The only subject tokens are issued for.
pub const ADMIN_SUBJECT: &str = "admin";

/// Default session length.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expires at (Unix seconds).
    pub exp: i64,
}

impl AdminClaims {
    /// The expiry as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Verifies the admin password and issues and checks session tokens.
pub struct AdminAuth {
    password_hash: String,
    token_secret: Vec<u8>,
    token_ttl: Duration,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl AdminAuth {
    /// Hashes the configured password with bcrypt's default cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the password or secret is empty or hashing fails.
    pub fn new(password: &str, token_secret: &str, token_ttl: Duration) -> Result<Self, AuthError> {
        Self::with_cost(password, token_secret, token_ttl, bcrypt::DEFAULT_COST)
    }

    /// Hashes the configured password with an explicit bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the password or secret is empty, the TTL is not
    /// positive or hashing fails.
    pub fn with_cost(
        password: &str,
        token_secret: &str,
        token_ttl: Duration,
        cost: u32,
    ) -> Result<Self, AuthError> {
        if password.is_empty() {
            return Err(AuthError::failed("Admin password is not configured"));
        }
        if token_secret.is_empty() {
            return Err(AuthError::failed("Token secret is not configured"));
        }
        if token_ttl <= Duration::zero() {
            return Err(AuthError::failed("Token lifetime must be positive"));
        }

        let password_hash: String = bcrypt::hash(password, cost)
            .map_err(|e| AuthError::failed(format!("Failed to hash admin password: {e}")))?;

        Ok(Self {
            password_hash,
            token_secret: token_secret.as_bytes().to_vec(),
            token_ttl,
        })
    }

    /// Exchanges the admin password for a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is wrong.
    pub fn login(&self, password: &str, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let matches: bool = bcrypt::verify(password, &self.password_hash)
            .map_err(|e| AuthError::failed(format!("Password verification failed: {e}")))?;

        if !matches {
            warn!("Admin login rejected");
            return Err(AuthError::failed("Invalid password"));
        }

        let expires_at: DateTime<Utc> = now + self.token_ttl;
        let claims = AdminClaims {
            sub: String::from(ADMIN_SUBJECT),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token: String = self.sign(&claims)?;

        info!(expires_at = %expires_at, "Admin session issued");
        Ok(IssuedToken { token, expires_at })
    }

    /// Checks a token's format, signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, tampered with or expired.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AdminClaims, AuthError> {
        let mut parts = token.split('.');
        let (Some(version), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::failed("Malformed token"));
        };
        if version != TOKEN_VERSION {
            return Err(AuthError::failed("Unsupported token version"));
        }

        let signature: Vec<u8> = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::failed("Malformed token signature"))?;
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| AuthError::failed("Invalid token signature"))?;

        let claims: AdminClaims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or_else(|| AuthError::failed("Malformed token payload"))?;

        if claims.sub != ADMIN_SUBJECT {
            return Err(AuthError::failed("Token subject is not admin"));
        }
        if now.timestamp() >= claims.exp {
            return Err(AuthError::failed("Session expired"));
        }

        Ok(claims)
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.token_secret)
            .map_err(|_| AuthError::failed("Invalid token secret"))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    fn sign(&self, claims: &AdminClaims) -> Result<String, AuthError> {
        let json: Vec<u8> = serde_json::to_vec(claims)
            .map_err(|e| AuthError::failed(format!("Failed to encode token: {e}")))?;
        let payload: String = URL_SAFE_NO_PAD.encode(json);
        let signature: String = URL_SAFE_NO_PAD.encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{TOKEN_VERSION}.{payload}.{signature}"))
    }
}
