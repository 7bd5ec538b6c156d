use anyhow::Result;
use callbook_config::ReportTimezone;
use callbook_core::time::{local_offset, utc_offset};
use callbook_core::{CallId, Revision};
use chrono::FixedOffset;
use std::str::FromStr;

use crate::error::invalid_input;

pub fn report_offset(timezone: ReportTimezone) -> FixedOffset {
    match timezone {
        ReportTimezone::Local => local_offset(),
        ReportTimezone::Utc => utc_offset(),
    }
}

pub fn parse_call_id(raw: &str) -> Result<CallId> {
    CallId::from_str(raw).map_err(|_| invalid_input("call id cannot be empty"))
}

pub fn parse_revision(raw: &str) -> Result<Revision> {
    Revision::from_str(raw).map_err(|_| invalid_input("revision cannot be empty"))
}

pub fn optional_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
