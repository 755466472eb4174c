//! Timestamp formatting utilities
//!
//! Records carry local time; encoders render it with one of these formats.
//! Both sink presets use ISO 8601 with milliseconds and a numeric offset.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp rendering options
///
/// # Examples
///
/// ```
/// use context_logger::core::TimestampFormat;
/// use chrono::Local;
///
/// let rendered = TimestampFormat::Iso8601.format(&Local::now());
/// assert!(rendered.contains('T'));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+0700`
    #[default]
    Iso8601,

    /// Floating point seconds since the Unix epoch: `1736332245.123`
    Epoch,
}

impl TimestampFormat {
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string(),
            TimestampFormat::Epoch => format!(
                "{}.{:03}",
                datetime.timestamp(),
                datetime.timestamp_subsec_millis()
            ),
        }
    }

    /// Render for a JSON document; epoch seconds become a JSON number
    #[must_use]
    pub fn to_json_value<Tz>(&self, datetime: &DateTime<Tz>) -> serde_json::Value
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Epoch => {
                let secs = datetime.timestamp() as f64
                    + f64::from(datetime.timestamp_subsec_micros()) / 1_000_000.0;
                serde_json::Number::from_f64(secs)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
            TimestampFormat::Iso8601 => serde_json::Value::String(self.format(datetime)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn fixed_datetime() -> DateTime<FixedOffset> {
        // 2025-01-08 10:30:45.123 at +07:00
        FixedOffset::east_opt(7 * 3600)
            .expect("valid offset")
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123+0700");
        assert_eq!(
            TimestampFormat::Iso8601.to_json_value(&fixed_datetime()),
            serde_json::Value::String(result)
        );
    }

    #[test]
    fn test_epoch_format() {
        let secs = TimestampFormat::Epoch.format(&fixed_datetime());
        assert!(secs.ends_with(".123"));

        let value = TimestampFormat::Epoch.to_json_value(&fixed_datetime());
        let millis = (value.as_f64().expect("numeric epoch") * 1000.0).round() as i64;
        assert_eq!(millis % 1000, 123);
    }

    #[test]
    fn test_default_is_iso8601() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::Iso8601);
    }
}
