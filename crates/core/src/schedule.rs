use chrono::{DateTime, Duration, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Maps a stage's day offset to its wall-clock send time.
///
/// Pure addition of (possibly fractional) days to the warmup start, applied
/// at millisecond resolution. No timezone normalization happens here; callers
/// are responsible for keeping `start` and display output in a consistent
/// zone.
pub fn send_time(start: DateTime<Utc>, day_offset: f64) -> DateTime<Utc> {
    start + Duration::milliseconds((day_offset * MS_PER_DAY).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-07-01T09:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn zero_offset_is_the_start_itself() {
        assert_eq!(send_time(start(), 0.0), start());
    }

    #[test]
    fn whole_days_advance_the_date() {
        assert_eq!(send_time(start(), 3.0), start() + Duration::days(3));
    }

    #[test]
    fn fractional_days_advance_by_hours() {
        // 0.5 days after a 12-hour interval spacing.
        assert_eq!(send_time(start(), 0.5), start() + Duration::hours(12));
        assert_eq!(send_time(start(), 1.25), start() + Duration::hours(30));
    }
}
