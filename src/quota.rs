use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day;

/// Ceiling on outbound image searches per calendar day.
pub const MAX_REQUESTS: u32 = 100;

/// Daily search counter. Stale once its date is not today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    count: u32,
    #[serde(with = "day")]
    date: NaiveDate,
}

impl Default for QuotaRecord {
    fn default() -> Self {
        Self::fresh(day::today())
    }
}

impl QuotaRecord {
    #[inline]
    #[must_use]
    pub const fn fresh(today: NaiveDate) -> Self {
        Self {
            count: 0,
            date: today,
        }
    }

    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    #[must_use]
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.date != today
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::fresh(today);
    }

    #[inline]
    #[must_use]
    pub const fn can_request(&self) -> bool {
        self.count < MAX_REQUESTS
    }

    /// Counts one finished search, successful or not. Never called for cache hits.
    pub fn record_attempt(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }
}
