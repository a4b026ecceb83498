//! CSV rendering.
//!
//! Fields are quoted only when they contain a delimiter, quote or line break;
//! rows end with `\n`. An optional announcements table follows the main
//! table after one blank line and a heading line.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::structure::{ReportTable, ANNOUNCEMENTS_TITLE};
use crate::ReportResult;

pub fn render(table: &ReportTable, announcements: Option<&ReportTable>) -> ReportResult<String> {
    let mut out = write_table(table)?;
    if let Some(a) = announcements.filter(|a| !a.rows.is_empty()) {
        out.push('\n');
        out.push_str(ANNOUNCEMENTS_TITLE);
        out.push('\n');
        out.push_str(&write_table(a)?);
    }
    Ok(out)
}

fn write_table(t: &ReportTable) -> ReportResult<String> {
    let mut w = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .flexible(false)
        .from_writer(Vec::new());
    w.write_record(&t.header)?;
    for r in &t.rows {
        w.write_record(r)?;
    }
    let bytes = w
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
    // Every cell is a Rust `String`, so the output is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
