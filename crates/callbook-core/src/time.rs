use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

pub fn format_timestamp_datetime(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_timestamp_date(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%Y-%m-%d").to_string()
}
