// src/render.rs
use std::fmt::Write as _;

use crate::detail::PeriodBounds;
use crate::error::Result;
use crate::report::{
    CellKind, DetailLine, DetailReport, LineKind, SummaryTable, DETAIL_HEADERS, DETAIL_KINDS,
};

// --- CSV ---

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Headers and text columns are always quoted, number columns are written
/// bare. Quoting follows the column, never the cell's content.
fn csv_document<'r>(
    headers: &[&str],
    kinds: &[CellKind],
    rows: impl IntoIterator<Item = &'r [String]>,
) -> Result<String> {
    // Fields arrive already quoted.
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers.iter().map(|h| quoted(h)))?;
    for row in rows {
        writer.write_record(row.iter().zip(kinds).map(|(cell, kind)| match kind {
            CellKind::Text => quoted(cell),
            CellKind::Number => cell.clone(),
        }))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn summary_csv(summary: &SummaryTable) -> Result<String> {
    csv_document(
        &summary.headers(),
        &summary.kinds(),
        summary.rows.iter().map(Vec::as_slice),
    )
}

/// Week rows with their TOTAL rows, then one PERIOD TOTAL row per employee.
pub fn detail_csv(detail: &DetailReport) -> Result<String> {
    let mut lines: Vec<DetailLine> = Vec::new();
    for employee in &detail.employees {
        for week in &employee.weeks {
            lines.extend(week.lines(&employee.name));
        }
        lines.push(employee.period_total_line());
    }
    csv_document(
        &DETAIL_HEADERS,
        &DETAIL_KINDS,
        lines.iter().map(|l| l.cells.as_slice()),
    )
}

// --- HTML ---

const STYLE: &str = r#"
    <style>
      body { font-family: Arial, sans-serif; font-size: small; }
      table { border-collapse: collapse; }
      th, td {
        border: 1px solid black;
        border-collapse: collapse;
        padding-left: 10px;
        padding-right: 10px;
      }
      th { background-color: #aed6f1; }
      tr.total td { font-weight: bold; }
    </style>
"#;

/// Escapes the characters HTML reserves in text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn header_row(out: &mut String, headers: &[&str]) {
    out.push_str("      <tr>");
    for header in headers {
        let _ = write!(out, "<th>{}</th>", escape_html(header));
    }
    out.push_str("</tr>\n");
}

fn body_row(out: &mut String, kind: LineKind, cells: &[String]) {
    match kind {
        LineKind::Record => {
            out.push_str("      <tr>");
            for cell in cells {
                let _ = write!(out, "<td>{}</td>", escape_html(cell));
            }
        }
        LineKind::Total => {
            out.push_str("      <tr class=\"total\">");
            for cell in cells {
                let _ = write!(out, "<td><strong>{}</strong></td>", escape_html(cell));
            }
        }
    }
    out.push_str("</tr>\n");
}

fn summary_section(out: &mut String, summary: &SummaryTable, period: &PeriodBounds) {
    out.push_str("    <h1>Timecard Report</h1>\n");
    let _ = writeln!(
        out,
        "    <h3>Hours Reported: {} - {}</h3>",
        period.start_label(),
        period.end_label()
    );
    out.push_str("    <table>\n");
    header_row(out, &summary.headers());
    for row in &summary.rows {
        body_row(out, LineKind::Record, row);
    }
    out.push_str("    </table>\n");
}

fn detail_section(out: &mut String, detail: &DetailReport) {
    out.push_str("    <h1>Timecard Details by Employee and Week</h1>\n");
    match detail.work_period {
        Some((start, end)) => {
            let _ = writeln!(out, "    <h3>Work Period: {} - {}</h3>", start, end);
        }
        None => out.push_str("    <h3>Work Period: NONE</h3>\n"),
    }

    for employee in &detail.employees {
        let name = escape_html(&employee.name);
        for week in &employee.weeks {
            let _ = writeln!(
                out,
                "    <h2>{} &ndash; Week {} [{} - {}]</h2>",
                name, week.relative_week, week.week_start, week.week_end
            );
            out.push_str("    <table>\n");
            header_row(out, &DETAIL_HEADERS);
            for line in week.lines(&employee.name) {
                body_row(out, line.kind, &line.cells);
            }
            out.push_str("    </table><br>\n");
        }

        match detail.work_period {
            Some((start, end)) => {
                let _ = writeln!(
                    out,
                    "    <h2>{} &ndash; Payroll Period Total [{} - {}]</h2>",
                    name, start, end
                );
            }
            None => {
                let _ = writeln!(out, "    <h2>{} &ndash; Payroll Period Total</h2>", name);
            }
        }
        out.push_str("    <table>\n");
        header_row(out, &DETAIL_HEADERS);
        let total = employee.period_total_line();
        body_row(out, total.kind, &total.cells);
        out.push_str("    </table><br>\n");
    }
}

/// One styled document holding the summary table and every detail table.
pub fn html_report(summary: &SummaryTable, detail: &DetailReport, period: &PeriodBounds) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    out.push_str("<title>Timecard Report</title>\n");
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n");
    summary_section(&mut out, summary, period);
    out.push_str("    <br>\n");
    detail_section(&mut out, detail);
    out.push_str("</body>\n</html>\n");
    out
}
