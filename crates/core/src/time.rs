//! Local date-time handling.
//!
//! Timestamps are zone-less local date-times (`NaiveDateTime`) interpreted in
//! one configured zone. The format pattern and the zone travel together in a
//! [`DateTimeFormat`] value that callers pass explicitly.

use std::sync::{PoisonError, RwLock};

use chrono::{Duration, FixedOffset, NaiveDateTime, Offset, Utc};

use crate::error::{DomainError, DomainResult};

/// Default wire pattern: `yyyy-MM-dd'T'HH:mm:ss`.
pub const DEFAULT_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

/// Default zone offset (UTC+3, no DST).
pub const DEFAULT_ZONE_OFFSET: &str = "+03:00";

/// Date-time format pattern + zone used for parsing, formatting and "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    pattern: String,
    zone: FixedOffset,
}

impl DateTimeFormat {
    pub fn new(pattern: impl Into<String>, zone: FixedOffset) -> Self {
        Self {
            pattern: pattern.into(),
            zone,
        }
    }

    /// Build from textual settings, e.g. (`"%Y-%m-%dT%H:%M:%S"`, `"+03:00"`).
    pub fn from_settings(pattern: &str, zone_offset: &str) -> DomainResult<Self> {
        let zone = zone_offset.trim().parse::<FixedOffset>().map_err(|e| {
            DomainError::invalid_argument(format!("invalid zone offset '{zone_offset}': {e}"))
        })?;
        Ok(Self::new(pattern, zone))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Parse a wire string into a local date-time.
    pub fn parse(&self, value: &str) -> DomainResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value, &self.pattern).map_err(|_| {
            DomainError::validation(format!(
                "date '{value}' does not match format {}",
                self.pattern
            ))
        })
    }

    pub fn format(&self, value: NaiveDateTime) -> String {
        value.format(&self.pattern).to_string()
    }

    /// Current wall-clock time in the configured zone.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.zone).naive_local()
    }
}

impl Default for DateTimeFormat {
    fn default() -> Self {
        let zone = FixedOffset::east_opt(3 * 3600).unwrap_or_else(|| Utc.fix());
        Self::new(DEFAULT_PATTERN, zone)
    }
}

/// Source of "now" for business rules.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in a configured zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    format: DateTimeFormat,
}

impl SystemClock {
    pub fn new(format: DateTimeFormat) -> Self {
        Self { format }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.format.now()
    }
}

/// Clock that only moves when told to (tests, replays).
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Poisoning is ignored: the stored timestamp is always valid.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn parses_and_formats_default_pattern() {
        let fmt = DateTimeFormat::default();
        let parsed = fmt.parse("2024-05-17T10:15:30").unwrap();
        assert_eq!(parsed, at(10, 15, 30));
        assert_eq!(fmt.format(parsed), "2024-05-17T10:15:30");
        assert_eq!(fmt.zone().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn rejects_strings_with_zone_suffix_or_garbage() {
        let fmt = DateTimeFormat::default();
        assert!(matches!(
            fmt.parse("2024-05-17T10:15:30Z"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(fmt.parse("yesterday"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn settings_reject_bad_offsets() {
        assert!(DateTimeFormat::from_settings(DEFAULT_PATTERN, "+05:00").is_ok());
        assert!(matches!(
            DateTimeFormat::from_settings(DEFAULT_PATTERN, "Mars/Olympus"),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn manual_clock_moves_only_on_request() {
        let clock = ManualClock::new(at(9, 0, 0));
        assert_eq!(clock.now(), at(9, 0, 0));
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), at(9, 5, 0));
        clock.set(at(12, 0, 0));
        assert_eq!(clock.now(), at(12, 0, 0));
    }

    #[test]
    fn manual_clock_keeps_working_after_a_panicking_writer() {
        let clock = std::sync::Arc::new(ManualClock::new(at(9, 0, 0)));
        let writer = clock.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.now.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(clock.now.is_poisoned());

        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), at(9, 5, 0));
        clock.set(at(12, 0, 0));
        assert_eq!(clock.now(), at(12, 0, 0));
    }
}
