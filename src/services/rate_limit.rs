//! Sliding-window request limiter keyed by account email.
//!
//! Applied to signup (keyed by the requested address) and to the contact
//! list/create routes (keyed by the bearer token's subject, not the IP).

use std::collections::HashMap;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use parking_lot::Mutex;

use crate::app::AppState;
use crate::auth::extractors::bearer_token;
use crate::error::AppError;

/// Current epoch seconds.
fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub struct RateLimiter {
    /// Maximum requests per window.
    limit: u32,
    /// Window size in seconds.
    window_secs: u64,
    /// Per-key request timestamps within the window.
    states: Mutex<HashMap<String, Vec<u64>>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window_secs: u64) -> Self {
        Self {
            limit,
            window_secs,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Allow or deny one request for `key`, recording it when allowed.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, now_secs())
    }

    fn check_at(&self, key: &str, now: u64) -> bool {
        let mut states = self.states.lock();
        let timestamps = states.entry(key.to_string()).or_default();

        let window_start = now.saturating_sub(self.window_secs);
        timestamps.retain(|&ts| ts > window_start);

        if timestamps.len() >= self.limit as usize {
            return false;
        }
        timestamps.push(now);
        true
    }

    /// Drop keys with no activity inside the window.
    pub fn cleanup_stale(&self) {
        let window_start = now_secs().saturating_sub(self.window_secs);
        self.states
            .lock()
            .retain(|_, timestamps| timestamps.iter().any(|&ts| ts > window_start));
    }
}

/// Middleware for protected routes: resolve the email from the bearer token
/// and reject with 429 before the handler runs once the window is full.
pub async fn limit_by_token_subject(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::InvalidToken)?;
    let email = state.auth.email_from_bearer(token)?;

    if !state.limiter.check(&email) {
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_within_limit() {
        let limiter = RateLimiter::new(5, 60);
        for _ in 0..5 {
            assert!(limiter.check("deadpool@example.com"));
        }
    }

    #[test]
    fn blocks_once_window_is_full() {
        let limiter = RateLimiter::new(3, 60);
        for _ in 0..3 {
            limiter.check("deadpool@example.com");
        }
        assert!(!limiter.check("deadpool@example.com"));
    }

    #[test]
    fn separate_keys_tracked_independently() {
        let limiter = RateLimiter::new(2, 60);

        limiter.check("a@example.com");
        limiter.check("a@example.com");
        assert!(!limiter.check("a@example.com"));

        assert!(limiter.check("b@example.com"));
    }

    #[test]
    fn window_slides_forward() {
        let limiter = RateLimiter::new(2, 60);

        assert!(limiter.check_at("a@example.com", 1_000));
        assert!(limiter.check_at("a@example.com", 1_010));
        assert!(!limiter.check_at("a@example.com", 1_020));

        // First request has left the window.
        assert!(limiter.check_at("a@example.com", 1_061));
    }

    #[test]
    fn cleanup_drops_idle_keys() {
        let limiter = RateLimiter::new(2, 60);
        limiter.check_at("old@example.com", 1);

        limiter.cleanup_stale();
        assert!(limiter.states.lock().is_empty());
    }
}
