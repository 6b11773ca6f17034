//! Per-user fixed-window rate limiting for the chat paths.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::api_error::ApiError;

/// Fixed one-minute windows keyed by user id. State is in-memory; restarting
/// the server resets all windows.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_minute: u32,
    windows: Mutex<HashMap<Uuid, (i64, u32)>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_per_minute: u32) -> Self {
        Self { max_per_minute, windows: Mutex::new(HashMap::new()) }
    }

    /// Record one request for the user, rejecting when the window is full.
    pub fn check(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.max_per_minute == 0 {
            return Ok(());
        }
        let minute = Utc::now().timestamp() / 60;
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = windows.entry(user_id).or_insert((minute, 0));
        if entry.0 != minute {
            *entry = (minute, 0);
        }
        if entry.1 >= self.max_per_minute {
            return Err(ApiError::RateLimited { retry_after: 60 });
        }
        entry.1 += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3);
        let user = Uuid::new_v4();
        for _ in 0..3 {
            assert!(limiter.check(user).is_ok());
        }
        assert!(matches!(limiter.check(user), Err(ApiError::RateLimited { .. })));
    }

    #[test]
    fn users_have_independent_windows() {
        let limiter = RateLimiter::new(1);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        assert!(limiter.check(first).is_ok());
        assert!(limiter.check(second).is_ok());
        assert!(limiter.check(first).is_err());
    }

    #[test]
    fn zero_limit_disables_enforcement() {
        let limiter = RateLimiter::new(0);
        let user = Uuid::new_v4();
        for _ in 0..100 {
            assert!(limiter.check(user).is_ok());
        }
    }
}
