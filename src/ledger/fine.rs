//! Fine policy
//!
//! overdue_days = max(0, ceil(returned - due in days))
//! fine         = overdue_days * daily_rate
//!
//! A return exactly at the due time is on time.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{DailyRate, Fine};

/// Flat per-day fine schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinePolicy {
    daily_rate: DailyRate,
}

impl FinePolicy {
    pub fn new(daily_rate: DailyRate) -> Self {
        Self { daily_rate }
    }

    pub fn daily_rate(&self) -> DailyRate {
        self.daily_rate
    }

    /// Whole days late, any started day counts as a full day
    pub fn overdue_days(&self, due: DateTime<Utc>, returned: DateTime<Utc>) -> u32 {
        let late = returned.signed_duration_since(due);
        if late <= TimeDelta::zero() {
            return 0;
        }

        let whole = late.num_days();
        let days = match TimeDelta::try_days(whole) {
            Some(full) if late > full => whole.saturating_add(1),
            _ => whole,
        };
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    pub fn assess(&self, due: DateTime<Utc>, returned: DateTime<Utc>) -> Fine {
        self.daily_rate.times(self.overdue_days(due, returned))
    }
}
