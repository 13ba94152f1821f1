//! Clock abstraction and timestamp formatting.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

/// A clock frozen at the given unix timestamp.
#[cfg_attr(not(test), allow(dead_code))]
pub fn fixed_clock(unix_secs: i64) -> Arc<dyn Clock> {
    let at = Utc
        .timestamp_opt(unix_secs, 0)
        .single()
        .unwrap_or_else(Utc::now);
    Arc::new(FixedClock(at))
}

pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// Parses the timestamps the API emits.
///
/// The server writes naive ISO-8601 values (`2024-01-02T03:04:05.123456`)
/// that are implicitly UTC. RFC 3339 values with an offset are accepted too.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats `then` relative to `now`: "Just now", "5m ago", "3h ago", "2d ago".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        "Just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}
