use crate::utils::time;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

/// Per-user daily evaluation quota with a lazily rolling 24h window.
///
/// Check and increment run under the entry's shard lock, so two concurrent calls for
/// one user can never both pass the last free slot. A limit of 0 denies everything.
#[derive(Debug)]
pub struct DailyUserLimiter {
    limit: u32,
    window: chrono::Duration,
    entries: DashMap<i64, RateLimitEntry>,
}

impl DailyUserLimiter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            window: time::one_day(),
            entries: DashMap::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn allow(&self, user_id: i64) -> bool {
        self.allow_at(user_id, time::now())
    }

    pub fn allow_at(&self, user_id: i64, now: DateTime<Utc>) -> bool {
        let window = self.window;
        let mut entry = self.entries.entry(user_id).or_insert_with(|| RateLimitEntry {
            count: 0,
            reset_at: now + window,
        });

        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + window;
        }

        if entry.count >= self.limit {
            tracing::warn!(
                user_id,
                limit = self.limit,
                reset_at = %entry.reset_at,
                "daily evaluation quota exhausted"
            );
            return false;
        }

        entry.count += 1;
        true
    }

    pub fn usage(&self, user_id: i64) -> Option<RateLimitEntry> {
        self.entries.get(&user_id).map(|e| *e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn denied_attempt_does_not_increment() {
        let limiter = DailyUserLimiter::new(1);
        let t0 = time::now();
        assert!(limiter.allow_at(5, t0));
        assert!(!limiter.allow_at(5, t0));
        assert!(!limiter.allow_at(5, t0));
        assert_eq!(limiter.usage(5).unwrap().count, 1);
    }

    #[test]
    fn zero_limit_denies_every_call() {
        let limiter = DailyUserLimiter::new(0);
        let t0 = time::now();
        assert!((0..3).all(|_| !limiter.allow_at(4, t0)));
        assert!(!limiter.allow_at(4, t0 + time::one_day()));
        assert_eq!(limiter.usage(4).unwrap().count, 0);
    }

    #[test]
    fn window_starts_at_first_use() {
        let limiter = DailyUserLimiter::new(3);
        let t0 = time::now();
        limiter.allow_at(9, t0);
        assert_eq!(limiter.usage(9).unwrap().reset_at, t0 + time::one_day());
    }

    #[test]
    fn concurrent_callers_never_exceed_limit() {
        let limiter = Arc::new(DailyUserLimiter::new(10));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || (0..5).filter(|_| limiter.allow(1)).count())
            })
            .collect();
        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 10);
    }
}
