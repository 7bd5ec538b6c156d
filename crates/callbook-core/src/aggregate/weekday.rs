use super::{NO_DATA_COLOR, NO_DATA_LABEL};
use crate::domain::CallRecord;
use chrono::{Datelike, FixedOffset};
use serde::Serialize;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const PALETTE: [&str; 7] = [
    "#ffd6a5", "#ffadad", "#caffbf", "#9bf6ff", "#a0c4ff", "#ffc6ff", "#bdb2ff",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayBucket {
    pub name: &'static str,
    pub count: usize,
    pub color: &'static str,
}

/// Counts records per weekday of `created_at`, read in `offset`.
///
/// Buckets appear in the order their weekday is first seen and take their
/// color from [`PALETTE`] by position. An empty input yields a single
/// zero-count "No data" bucket.
pub fn weekday_histogram(records: &[CallRecord], offset: FixedOffset) -> Vec<WeekdayBucket> {
    if records.is_empty() {
        return vec![WeekdayBucket {
            name: NO_DATA_LABEL,
            count: 0,
            color: NO_DATA_COLOR,
        }];
    }

    let mut buckets: Vec<WeekdayBucket> = Vec::new();
    for record in records {
        let name = weekday_name(record, offset);
        match buckets.iter_mut().find(|bucket| bucket.name == name) {
            Some(bucket) => bucket.count += 1,
            None => {
                let color = PALETTE[buckets.len() % PALETTE.len()];
                buckets.push(WeekdayBucket {
                    name,
                    count: 1,
                    color,
                });
            }
        }
    }
    buckets
}

fn weekday_name(record: &CallRecord, offset: FixedOffset) -> &'static str {
    let weekday = record.created_at.with_timezone(&offset).weekday();
    WEEKDAY_NAMES[weekday.num_days_from_sunday() as usize]
}

#[cfg(test)]
mod tests {
    use super::{weekday_histogram, PALETTE};
    use crate::domain::{CallFields, CallId, CallRecord, Revision};
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn record(id: &str, created_at: DateTime<Utc>) -> CallRecord {
        CallRecord {
            id: CallId::new(id).unwrap(),
            fields: CallFields {
                customer_name: "Ada".to_string(),
                customer_phone: "5551-2345".to_string(),
                customer_email: "ada@gmail.com".to_string(),
                call_status: "open".to_string(),
                comments: None,
                duration_minutes: 5,
                agent_name: "Grace".to_string(),
                photo_uri: None,
            },
            created_at,
            revision: Revision::new("1").unwrap(),
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn empty_input_yields_placeholder() {
        let buckets = weekday_histogram(&[], utc());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name, "No data");
        assert_eq!(buckets[0].count, 0);
        assert_eq!(buckets[0].color, "#d3d3d3");
    }

    #[test]
    fn buckets_follow_first_seen_order() {
        // 2030-01-16 is a Wednesday, 2030-01-13 a Sunday.
        let records = vec![
            record("a", Utc.with_ymd_and_hms(2030, 1, 16, 10, 0, 0).unwrap()),
            record("b", Utc.with_ymd_and_hms(2030, 1, 13, 10, 0, 0).unwrap()),
            record("c", Utc.with_ymd_and_hms(2030, 1, 9, 10, 0, 0).unwrap()),
        ];
        let buckets = weekday_histogram(&records, utc());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].name, "Wednesday");
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].color, PALETTE[0]);
        assert_eq!(buckets[1].name, "Sunday");
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[1].color, PALETTE[1]);
        let total: usize = buckets.iter().map(|bucket| bucket.count).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn offset_can_move_a_record_to_the_next_day() {
        // Saturday 23:30 UTC is Sunday in UTC+2.
        let records = vec![record(
            "a",
            Utc.with_ymd_and_hms(2030, 1, 12, 23, 30, 0).unwrap(),
        )];
        assert_eq!(weekday_histogram(&records, utc())[0].name, "Saturday");
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(weekday_histogram(&records, plus_two)[0].name, "Sunday");
    }
}
