use crate::aggregate::{DurationPoint, WeekdayBucket};

pub const DEFAULT_REPORT_TITLE: &str = "Call Report";

const STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; padding: 0; color: #333; }
h1 { color: #ff6f00; text-align: center; }
h3 { color: #ffa500; text-align: center; }
table { width: 100%; border-collapse: collapse; margin-top: 20px; }
th { background-color: #ffcc80; color: #333; padding: 10px; text-align: center; }
td { border: 1px solid #ddd; padding: 10px; }
.footer { margin-top: 30px; text-align: center; font-size: 14px; color: #999; }";

/// Inputs for the printable summary: both aggregation outputs plus labels.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub title: &'a str,
    pub generated_at: &'a str,
    pub weekdays: &'a [WeekdayBucket],
    pub durations: &'a [DurationPoint],
}

/// Renders the report as a standalone HTML document laid out as two tables.
pub fn render_report(report: &Report<'_>) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(report.title)));
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("\n</style>\n</head>\n<body>\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html(report.title)));

    out.push_str("<h3>Calls by weekday</h3>\n");
    out.push_str("<table>\n<thead>\n<tr><th>Day</th><th>Number of calls</th><th>Color</th></tr>\n</thead>\n<tbody>\n");
    for bucket in report.weekdays {
        out.push_str(&format!(
            "<tr><td style=\"text-align: left; color: #555;\">{}</td><td style=\"text-align: center; color: #555;\">{}</td><td style=\"background-color: {};\"></td></tr>\n",
            escape_html(bucket.name),
            bucket.count,
            escape_html(bucket.color)
        ));
    }
    out.push_str("</tbody>\n</table>\n");

    out.push_str("<h3>Duration per call</h3>\n");
    out.push_str("<table>\n<thead>\n<tr><th>Call</th><th>Duration (min)</th></tr>\n</thead>\n<tbody>\n");
    for point in report.durations {
        out.push_str(&format!(
            "<tr><td style=\"text-align: left; color: #555;\">{}</td><td style=\"text-align: center; color: #555;\">{}</td></tr>\n",
            escape_html(&point.label),
            point.minutes
        ));
    }
    out.push_str("</tbody>\n</table>\n");

    out.push_str(&format!(
        "<p class=\"footer\">Generated {}.</p>\n",
        escape_html(report.generated_at)
    ));
    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_html, render_report, Report, DEFAULT_REPORT_TITLE};
    use crate::aggregate::{duration_series, weekday_histogram, DurationPoint, WeekdayBucket};
    use chrono::FixedOffset;

    #[test]
    fn renders_one_row_per_bucket_and_point() {
        let weekdays = vec![
            WeekdayBucket {
                name: "Monday",
                count: 3,
                color: "#ffd6a5",
            },
            WeekdayBucket {
                name: "Friday",
                count: 1,
                color: "#ffadad",
            },
        ];
        let durations = vec![
            DurationPoint {
                label: "Call 1".to_string(),
                minutes: 12,
            },
            DurationPoint {
                label: "Call 2".to_string(),
                minutes: 60,
            },
        ];
        let html = render_report(&Report {
            title: DEFAULT_REPORT_TITLE,
            generated_at: "2030-01-15 13:45",
            weekdays: &weekdays,
            durations: &durations,
        });

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Call Report</h1>"));
        assert!(html.contains(">Monday</td>"));
        assert!(html.contains("background-color: #ffadad;"));
        assert!(html.contains(">Call 2</td><td style=\"text-align: center; color: #555;\">60</td>"));
        assert_eq!(html.matches("<tr><td").count(), 4);
        assert!(html.contains("Generated 2030-01-15 13:45."));
    }

    #[test]
    fn placeholder_aggregates_render_no_data_rows() {
        let weekdays = weekday_histogram(&[], FixedOffset::east_opt(0).unwrap());
        let durations = duration_series(&[]);
        let html = render_report(&Report {
            title: "Calls",
            generated_at: "now",
            weekdays: &weekdays,
            durations: &durations,
        });
        assert_eq!(html.matches(">No data</td>").count(), 2);
    }

    #[test]
    fn title_is_escaped() {
        let html = render_report(&Report {
            title: "Q&A <team>",
            generated_at: "now",
            weekdays: &[],
            durations: &[],
        });
        assert!(html.contains("<h1>Q&amp;A &lt;team&gt;</h1>"));
        assert_eq!(escape_html("\"'"), "&quot;&#39;");
    }
}
