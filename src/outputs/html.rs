//! The searchable static HTML page.
//!
//! The page is self-contained: styles and scripts are inline, and every
//! piece of feed text is HTML-escaped before it is written. Client-side it
//! offers a service search box, per-column filtering on header click and an
//! "Export to CSV" button that downloads the rows currently visible.

use crate::models::Report;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::error::Error;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            background-color: #f4f4f9;
            margin: 0;
            padding: 20px;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
        }
        .search-container {
            display: flex;
            justify-content: center;
            margin-bottom: 20px;
        }
        .search-bar {
            padding: 10px;
            width: 300px;
            box-sizing: border-box;
            border-radius: 5px;
            border: 1px solid #ddd;
            transition: width 0.4s ease-in-out;
        }
        .search-bar:focus {
            width: 500px;
        }
        .search-btn, .export-btn {
            padding: 10px;
            margin-left: 10px;
            background-color: #0078d4;
            color: white;
            border: none;
            border-radius: 5px;
            cursor: pointer;
            transition: background-color 0.3s ease;
        }
        .search-btn:hover, .export-btn:hover {
            background-color: #005ba1;
        }
        .table-container {
            width: 100%;
            overflow-x: auto;
        }
        table {
            width: 100%;
            border-collapse: collapse;
            background-color: white;
            box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
            table-layout: auto;
            min-width: 600px;
        }
        th, td {
            padding: 10px;
            border: 1px solid #ddd;
            text-align: left;
            cursor: pointer;
        }
        th {
            background-color: #f2f2f2;
            color: #333;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        tr:nth-child(odd) {
            background-color: #ffffff;
        }
        .generated {
            color: #666;
            font-size: 0.85em;
            margin-top: 20px;
        }
"#;

const SCRIPT: &str = r#"        function searchService() {
            let input = document.getElementById('searchInput').value.toLowerCase();
            let rows = document.getElementById('retirementTable').getElementsByTagName('tr');
            for (let i = 1; i < rows.length; i++) {
                let title = rows[i].getElementsByTagName('td')[0].innerText.toLowerCase();
                rows[i].style.display = title.includes(input) ? '' : 'none';
            }
        }

        function filterByColumn(columnIndex) {
            let answer = prompt("Enter text to filter by:");
            if (answer === null) {
                return;
            }
            let filterText = answer.toLowerCase();
            let rows = document.getElementById('retirementTable').getElementsByTagName('tr');
            for (let i = 1; i < rows.length; i++) {
                let cellText = rows[i].getElementsByTagName('td')[columnIndex].innerText.toLowerCase();
                rows[i].style.display = cellText.includes(filterText) ? '' : 'none';
            }
        }

        function exportToCSV() {
            let rows = document.querySelectorAll('#retirementTable tr:not([style*="display: none"])');
            let csv = [];
            rows.forEach(row => {
                let cols = row.querySelectorAll('td, th');
                let csvRow = [];
                cols.forEach(col => {
                    csvRow.push('"' + col.innerText.replace(/"/g, '""') + '"');
                });
                csv.push(csvRow.join(','));
            });

            let blob = new Blob([csv.join("\n")], { type: 'text/csv;charset=utf-8;' });
            let link = document.createElement('a');
            link.setAttribute('href', URL.createObjectURL(blob));
            link.setAttribute('download', document.body.dataset.csvName);
            document.body.appendChild(link);
            link.click();
            document.body.removeChild(link);
        }
"#;

/// Only http(s) links become anchors; anything else is shown as plain text.
fn safe_href(link: &str) -> Option<&str> {
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(link),
        _ => None,
    }
}

/// Render the full page.
///
/// `csv_name` is the file name offered by the page's "Export to CSV" button.
pub fn render(report: &Report, csv_name: &str) -> Result<String, fmt::Error> {
    let title = encode_text(&report.title);
    let mut page = String::new();

    writeln!(page, "<!DOCTYPE html>")?;
    writeln!(page, "<html lang=\"en\">")?;
    writeln!(page, "<head>")?;
    writeln!(page, "    <meta charset=\"UTF-8\">")?;
    writeln!(
        page,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(page, "    <title>{title}</title>")?;
    write!(page, "    <style>\n{STYLE}    </style>\n")?;
    write!(page, "    <script>\n{SCRIPT}    </script>\n")?;
    writeln!(page, "</head>")?;
    writeln!(
        page,
        "<body data-csv-name=\"{}\">",
        encode_double_quoted_attribute(csv_name)
    )?;
    writeln!(page, "    <h1>{title}</h1>")?;
    writeln!(page, "    <div class=\"search-container\">")?;
    writeln!(
        page,
        "        <input type=\"text\" id=\"searchInput\" class=\"search-bar\" placeholder=\"Search for services..\">"
    )?;
    writeln!(
        page,
        "        <button class=\"search-btn\" onclick=\"searchService()\">Search</button>"
    )?;
    writeln!(
        page,
        "        <button class=\"export-btn\" onclick=\"exportToCSV()\">Export to CSV</button>"
    )?;
    writeln!(page, "    </div>")?;
    writeln!(page, "    <div class=\"table-container\">")?;
    writeln!(page, "        <table id=\"retirementTable\">")?;
    writeln!(page, "            <thead>")?;
    writeln!(page, "                <tr>")?;
    for (i, header) in [
        "Service",
        "Description",
        "Publication Date",
        "Target Retirement Date",
    ]
    .iter()
    .enumerate()
    {
        writeln!(
            page,
            "                    <th onclick=\"filterByColumn({i})\">{header}</th>"
        )?;
    }
    writeln!(page, "                </tr>")?;
    writeln!(page, "            </thead>")?;
    writeln!(page, "            <tbody>")?;

    for row in &report.rows {
        let service = match safe_href(&row.link) {
            Some(href) => format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                encode_double_quoted_attribute(href),
                encode_text(&row.title)
            ),
            None => encode_text(&row.title).into_owned(),
        };
        writeln!(page, "                <tr>")?;
        writeln!(page, "                    <td>{service}</td>")?;
        writeln!(
            page,
            "                    <td>{}</td>",
            encode_text(&row.description)
        )?;
        writeln!(
            page,
            "                    <td>{}</td>",
            encode_text(&row.pub_date)
        )?;
        writeln!(
            page,
            "                    <td>{}</td>",
            encode_text(&row.retirement_date.to_string())
        )?;
        writeln!(page, "                </tr>")?;
    }

    writeln!(page, "            </tbody>")?;
    writeln!(page, "        </table>")?;
    writeln!(page, "    </div>")?;
    writeln!(
        page,
        "    <p class=\"generated\">{} announcements from {} &middot; generated {}</p>",
        report.rows.len(),
        encode_text(&report.feed_source),
        encode_text(&report.generated_at)
    )?;
    writeln!(page, "</body>")?;
    writeln!(page, "</html>")?;
    Ok(page)
}

/// Write the page to `{output_dir}/{report_name}.html`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_report(
    report: &Report,
    output_dir: &Path,
    report_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let csv_name = format!("{report_name}.csv");
    let html = render(report, &csv_name)?;
    let path = super::Format::Html.path_in(output_dir, report_name);

    fs::write(&path, html).await?;
    info!(path = %path.display(), rows = report.rows.len(), "Wrote HTML report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportRow, RetirementDate};

    fn row(title: &str, link: &str, description: &str, date: RetirementDate) -> ReportRow {
        ReportRow {
            title: title.to_string(),
            link: link.to_string(),
            description: description.to_string(),
            pub_date: "14 October 2024".to_string(),
            retirement_date: date,
            date_entities: None,
        }
    }

    fn report(rows: Vec<ReportRow>) -> Report {
        Report {
            title: "Azure Service Retirements".to_string(),
            feed_source: "https://aztty.azurewebsites.net/rss/updates?category=retirements"
                .to_string(),
            generated_at: "2024-10-15T00:00:00Z".to_string(),
            rows,
            skipped: vec![],
        }
    }

    #[test]
    fn test_page_structure() {
        let html = render(
            &report(vec![row(
                "Retirement: Classic VMs",
                "https://example.com/vms",
                "Migrate now",
                RetirementDate::Found("1 March, 2025".to_string()),
            )]),
            "azure_service_retirements.csv",
        )
        .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Azure Service Retirements</title>"));
        assert!(html.contains("<th onclick=\"filterByColumn(3)\">Target Retirement Date</th>"));
        assert!(html.contains(
            "<a href=\"https://example.com/vms\" target=\"_blank\" rel=\"noopener\">Retirement: Classic VMs</a>"
        ));
        assert!(html.contains("<td>1 March, 2025</td>"));
        assert!(html.contains("data-csv-name=\"azure_service_retirements.csv\""));
        assert!(html.contains("1 announcements from"));
    }

    #[test]
    fn test_feed_text_is_escaped() {
        let html = render(
            &report(vec![row(
                "<script>alert(1)</script>",
                "https://example.com/?a=1&b=\"2\"",
                "Use <b>v2</b> & later",
                RetirementDate::NotFound,
            )]),
            "r.csv",
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Use &lt;b&gt;v2&lt;/b&gt; &amp; later"));
        assert!(html.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains("<td>No date found</td>"));
    }

    #[test]
    fn test_non_http_links_are_not_anchors() {
        let html = render(
            &report(vec![row(
                "Suspicious",
                "javascript:alert(1)",
                "",
                RetirementDate::NotFound,
            )]),
            "r.csv",
        )
        .unwrap();
        assert!(!html.contains("javascript:"));
        assert!(html.contains("<td>Suspicious</td>"));
    }

    #[test]
    fn test_safe_href() {
        assert_eq!(safe_href("https://example.com"), Some("https://example.com"));
        assert_eq!(safe_href("ftp://example.com"), None);
        assert_eq!(safe_href(""), None);
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&report(vec![]), dir.path(), "azure_service_retirements")
            .await
            .unwrap();
        assert!(path.ends_with("azure_service_retirements.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("data-csv-name=\"azure_service_retirements.csv\""));
    }
}
