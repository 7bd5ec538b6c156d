//! Chart-ready views over the list of records, in the order the store
//! returned them.

pub mod duration;
pub mod weekday;

pub use duration::{duration_series, DurationPoint, CALL_LABEL_PREFIX};
pub use weekday::{weekday_histogram, WeekdayBucket, PALETTE, WEEKDAY_NAMES};

pub const NO_DATA_LABEL: &str = "No data";
pub const NO_DATA_COLOR: &str = "#d3d3d3";
