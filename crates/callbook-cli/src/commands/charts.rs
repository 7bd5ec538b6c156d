use crate::commands::{print_json, Context};
use crate::util::report_offset;
use anyhow::{Context as _, Result};
use callbook_core::time::{format_timestamp_datetime, now_utc};
use callbook_core::{duration_series, render_report, weekday_histogram, Report};
use callbook_store::paths;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[arg(value_enum)]
    pub kind: ChartKind,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChartKind {
    /// Number of calls per weekday
    Weekday,
    /// Duration of each call
    Duration,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Output file, defaults to a timestamped file under the data dir
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Overrides report.title from the config
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportSummary {
    output: String,
    calls: usize,
}

pub fn chart(ctx: &Context<'_>, args: ChartArgs) -> Result<()> {
    let records = ctx.store.list_all().with_context(|| "list calls")?;
    match args.kind {
        ChartKind::Weekday => {
            let buckets = weekday_histogram(&records, report_offset(ctx.config.report.timezone));
            if ctx.json {
                return print_json(&buckets);
            }
            for bucket in &buckets {
                println!("{:<10} {:>4}  {}", bucket.name, bucket.count, bucket.color);
            }
        }
        ChartKind::Duration => {
            let points = duration_series(&records);
            if ctx.json {
                return print_json(&points);
            }
            for point in &points {
                println!("{:<10} {:>4} min", point.label, point.minutes);
            }
        }
    }
    Ok(())
}

pub fn report(ctx: &Context<'_>, args: ReportArgs) -> Result<()> {
    let records = ctx.store.list_all().with_context(|| "list calls")?;
    let offset = report_offset(ctx.config.report.timezone);
    let now = now_utc();

    let weekdays = weekday_histogram(&records, offset);
    let durations = duration_series(&records);
    let generated_at = format_timestamp_datetime(now, offset);
    let title = args
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(ctx.config.report.title.as_str());
    let html = render_report(&Report {
        title,
        generated_at: &generated_at,
        weekdays: &weekdays,
        durations: &durations,
    });

    let out = match args.out {
        Some(path) => path,
        None => {
            let stamp = now.with_timezone(&offset).format("%Y%m%d-%H%M%S").to_string();
            paths::report_path(&stamp)?
        }
    };
    fs::write(&out, html).with_context(|| format!("write report {}", out.display()))?;

    if ctx.json {
        return print_json(&ReportSummary {
            output: out.display().to_string(),
            calls: records.len(),
        });
    }
    println!("Report written to {}", out.display());
    Ok(())
}
