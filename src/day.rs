//! Calendar-day keys for the persisted records.
//!
//! Records are written with ISO dates. The browser's `Date.toDateString()`
//! form (`Fri Oct 16 2026`) is also accepted so that exported browser
//! storage loads as-is.
use chrono::{Local, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serializer};

const ISO_FORMAT: &str = "%Y-%m-%d";
const BROWSER_FORMAT: &str = "%a %b %d %Y";

#[inline]
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, ISO_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, BROWSER_FORMAT))
        .ok()
}

/// Whole days from `earlier` to `later`, negative if `earlier` is in the future.
#[inline]
#[must_use]
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&day.format(ISO_FORMAT))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_day(&s).ok_or_else(|| de::Error::custom(format!("unrecognised day `{s}`")))
}
