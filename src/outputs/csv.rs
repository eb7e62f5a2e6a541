//! CSV export of the report table.

use crate::models::Report;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Column headers, matching the HTML table plus the link.
pub const HEADERS: [&str; 5] = [
    "Service",
    "Description",
    "Publication Date",
    "Target Retirement Date",
    "Link",
];

/// Render the report rows as CSV text, header first.
pub fn render(report: &Report) -> Result<String, Box<dyn Error>> {
    let mut writer = ::csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in &report.rows {
        let retirement_date = row.retirement_date.to_string();
        writer.write_record([
            row.title.as_str(),
            row.description.as_str(),
            row.pub_date.as_str(),
            retirement_date.as_str(),
            row.link.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Write the CSV export to `{output_dir}/{report_name}.csv`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_report(
    report: &Report,
    output_dir: &Path,
    report_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let csv = render(report)?;
    let path = super::Format::Csv.path_in(output_dir, report_name);

    fs::write(&path, csv).await?;
    info!(path = %path.display(), rows = report.rows.len(), "Wrote CSV report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportRow, RetirementDate};

    fn report() -> Report {
        Report {
            title: "Azure Service Retirements".to_string(),
            feed_source: "feed.xml".to_string(),
            generated_at: "2024-10-15T00:00:00Z".to_string(),
            rows: vec![
                ReportRow {
                    title: "Retirement: \"Classic\" VMs".to_string(),
                    link: "https://example.com/vms".to_string(),
                    description: "Migrate, then delete".to_string(),
                    pub_date: "14 October 2024".to_string(),
                    retirement_date: RetirementDate::Found("1 March, 2025".to_string()),
                    date_entities: None,
                },
                ReportRow {
                    title: "Portal update".to_string(),
                    link: "https://example.com/portal".to_string(),
                    description: "No action needed".to_string(),
                    pub_date: "15 October 2024".to_string(),
                    retirement_date: RetirementDate::NotFound,
                    date_entities: None,
                },
            ],
            skipped: vec![],
        }
    }

    #[test]
    fn test_render_quotes_and_sentinel() {
        let csv = render(&report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Service,Description,Publication Date,Target Retirement Date,Link"
        );
        assert_eq!(
            lines[1],
            r#""Retirement: ""Classic"" VMs","Migrate, then delete",14 October 2024,"1 March, 2025",https://example.com/vms"#
        );
        assert_eq!(
            lines[2],
            "Portal update,No action needed,15 October 2024,No date found,https://example.com/portal"
        );
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&report(), dir.path(), "retirements").await.unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
