pub mod aggregate;
pub mod domain;
pub mod error;
pub mod report;
pub mod rules;
pub mod time;

pub use aggregate::{duration_series, weekday_histogram, DurationPoint, WeekdayBucket};
pub use domain::*;
pub use error::{CredentialsError, ValidationError};
pub use report::{render_report, Report, DEFAULT_REPORT_TITLE};
pub use rules::*;
