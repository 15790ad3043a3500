//! News entity and relative-time labels

use chrono::{DateTime, Utc};
use kernel::id::NewsId;

#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub id: NewsId,
    pub title: String,
    pub image: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Indonesian "time ago" label. Future timestamps read as "Just now".
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created_at).num_seconds();

    match secs {
        s if s < MINUTE => "Just now".to_string(),
        s if s < HOUR => format!("{} menit yang lalu", s / MINUTE),
        s if s < DAY => format!("{} jam yang lalu", s / HOUR),
        s if s < MONTH => format!("{} hari yang lalu", s / DAY),
        s if s < YEAR => format!("{} bulan yang lalu", s / MONTH),
        s => format!("{} tahun yang lalu", s / YEAR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_time_ago_thresholds() {
        let now = Utc::now();
        let ago = |d: Duration| time_ago(now - d, now);

        assert_eq!(ago(Duration::seconds(59)), "Just now");
        assert_eq!(ago(Duration::seconds(60)), "1 menit yang lalu");
        assert_eq!(ago(Duration::minutes(59)), "59 menit yang lalu");
        assert_eq!(ago(Duration::hours(5)), "5 jam yang lalu");
        assert_eq!(ago(Duration::days(29)), "29 hari yang lalu");
        assert_eq!(ago(Duration::days(65)), "2 bulan yang lalu");
        assert_eq!(ago(Duration::days(800)), "2 tahun yang lalu");
    }

    #[test]
    fn test_future_is_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::hours(1), now), "Just now");
    }
}
