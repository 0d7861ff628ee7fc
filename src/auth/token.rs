//! Cached session token with expiry tracking.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;

pub struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl CachedToken {
    /// Token valid for `expires_in_secs` seconds from now.
    pub fn new(token: SecretString, expires_in_secs: f64) -> Self {
        let millis = (expires_in_secs * 1000.0).clamp(i64::MIN as f64, i64::MAX as f64) as i64;
        let ttl = TimeDelta::try_milliseconds(millis).unwrap_or(TimeDelta::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { token, expires_at }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True once the remaining lifetime drops below `margin`.
    pub fn needs_refresh(&self, margin: Duration) -> bool {
        let remaining = self.expires_at.signed_duration_since(Utc::now());
        let margin = TimeDelta::from_std(margin).unwrap_or(TimeDelta::MAX);
        remaining < margin
    }
}
