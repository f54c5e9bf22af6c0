use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token payload. Only the caller's id travels in the token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
}

impl Claims {
    pub fn new(user_id: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            exp: expires_at.timestamp().max(0) as usize,
        }
    }
}

/// Verified caller, placed in request extensions by the auth guard.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
