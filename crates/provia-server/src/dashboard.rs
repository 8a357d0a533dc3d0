//! HTML rendering for the audit dashboard.
//!
//! A single read-only page: the most recent audit records, newest first,
//! with an optional substring filter.

use provia_audit::AuditRecord;

/// Render the dashboard page for a set of records.
pub fn render(records: &[AuditRecord], query: Option<&str>) -> String {
    let rows: String = records
        .iter()
        .map(|record| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&record.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string()),
                escape(&record.operation.to_string().to_uppercase()),
                escape(&record.subject),
                match record.allowed {
                    Some(true) => "allowed",
                    Some(false) => "denied",
                    None => "-",
                },
                escape(record.reason.as_deref().unwrap_or("-")),
                escape(&backend_summary(record)),
            )
        })
        .collect();

    let filter_value = escape(query.unwrap_or(""));
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Provia Audit</title>
<style>
body {{ font-family: monospace; margin: 2em; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; }}
th {{ background: #f0f0f0; }}
form {{ margin-bottom: 1em; }}
</style>
</head>
<body>
<h1>Provia Audit Trail</h1>
<form method="get" action="/dashboard">
<input type="text" name="q" value="{filter_value}" placeholder="filter records">
<button type="submit">Search</button>
</form>
<p>{count} record(s)</p>
<table>
<tr><th>Time (UTC)</th><th>Operation</th><th>Subject</th><th>Policy</th><th>Reason</th><th>Backends</th></tr>
{rows}</table>
</body>
</html>
"#,
        count = records.len(),
    )
}

fn backend_summary(record: &AuditRecord) -> String {
    if record.backends.is_empty() {
        return "-".to_string();
    }
    record
        .backends
        .iter()
        .map(|b| format!("{}={}", b.backend, b.status))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Minimal HTML escaping; record content is attacker-influenced.
fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
