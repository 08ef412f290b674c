//! Creation timestamps
//!
//! Items are ordered by `created_at`, so two inserts must never share a
//! timestamp. The clock hands out wall-clock time truncated to microseconds
//! (the precision every store keeps) and bumps by one microsecond whenever
//! the wall clock has not moved past the last stamp.

use std::sync::Mutex;

use chrono::{DateTime, Duration, SubsecRound, Utc};

#[derive(Debug, Default)]
pub struct ItemClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl ItemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next creation timestamp, strictly after every earlier one.
    pub fn tick(&self) -> DateTime<Utc> {
        let wall = wall_clock();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let next = match *last {
            Some(prev) if prev >= wall => prev + Duration::microseconds(1),
            _ => wall,
        };
        *last = Some(next);
        next
    }

    /// Current time as a pagination fence.
    ///
    /// Never earlier than the last issued stamp, and every later `tick` is
    /// strictly after it, so items created afterwards fall outside the fence.
    pub fn now(&self) -> DateTime<Utc> {
        let wall = wall_clock();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let fence = match *last {
            Some(prev) if prev > wall => prev,
            _ => wall,
        };
        *last = Some(fence);
        fence
    }
}

fn wall_clock() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
