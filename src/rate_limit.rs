use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Fixed-window limiter for public contact form posts, keyed by client IP.
pub struct ContactRateLimiter {
    limit: u32,
    window: Duration,
    windows: DashMap<IpAddr, Window>,
}

impl ContactRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
        }
    }

    /// Count one post from `ip`. Over the limit, returns the seconds until the
    /// current window closes.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let now = Instant::now();
        let mut entry = self.windows.entry(ip).or_insert(Window {
            started: now,
            hits: 0,
        });

        let elapsed = now.duration_since(entry.started);
        if elapsed > self.window {
            *entry = Window {
                started: now,
                hits: 1,
            };
            return Ok(());
        }

        if entry.hits >= self.limit {
            return Err(self.window.saturating_sub(elapsed).as_secs().max(1));
        }

        entry.hits += 1;
        Ok(())
    }

    /// Forget clients whose window has closed.
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, w| now.duration_since(w.started) <= self.window);
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
