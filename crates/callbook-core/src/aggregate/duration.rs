use super::NO_DATA_LABEL;
use crate::domain::CallRecord;
use serde::Serialize;

pub const CALL_LABEL_PREFIX: &str = "Call";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationPoint {
    pub label: String,
    pub minutes: u32,
}

/// One point per record, labeled by position: "Call 1", "Call 2", ...
pub fn duration_series(records: &[CallRecord]) -> Vec<DurationPoint> {
    if records.is_empty() {
        return vec![DurationPoint {
            label: NO_DATA_LABEL.to_string(),
            minutes: 0,
        }];
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| DurationPoint {
            label: format!("{} {}", CALL_LABEL_PREFIX, index + 1),
            minutes: u32::from(record.fields.duration_minutes),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::duration_series;
    use crate::domain::{CallFields, CallId, CallRecord, Revision};
    use chrono::{TimeZone, Utc};

    fn record(id: &str, minutes: u8) -> CallRecord {
        CallRecord {
            id: CallId::new(id).unwrap(),
            fields: CallFields {
                customer_name: "Ada".to_string(),
                customer_phone: "5551-2345".to_string(),
                customer_email: "ada@gmail.com".to_string(),
                call_status: "open".to_string(),
                comments: None,
                duration_minutes: minutes,
                agent_name: "Grace".to_string(),
                photo_uri: None,
            },
            created_at: Utc.with_ymd_and_hms(2030, 1, 16, 10, 0, 0).unwrap(),
            revision: Revision::new("1").unwrap(),
        }
    }

    #[test]
    fn empty_input_yields_placeholder() {
        let series = duration_series(&[]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "No data");
        assert_eq!(series[0].minutes, 0);
    }

    #[test]
    fn keeps_input_order_with_positional_labels() {
        let records = vec![record("newest", 30), record("middle", 5), record("oldest", 60)];
        let series = duration_series(&records);
        let labels: Vec<&str> = series.iter().map(|point| point.label.as_str()).collect();
        let minutes: Vec<u32> = series.iter().map(|point| point.minutes).collect();
        assert_eq!(labels, ["Call 1", "Call 2", "Call 3"]);
        assert_eq!(minutes, [30, 5, 60]);
    }
}
