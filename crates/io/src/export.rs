// Outreach log export

use std::path::Path;

use chrono::NaiveDate;
use fieldplan_engine::OutreachLog;

use crate::error::IoError;

/// Export columns, in [`OutreachLog`] field order.
pub const EXPORT_HEADERS: [&str; 10] = [
    "id",
    "company",
    "date",
    "type",
    "outcome",
    "notes",
    "nextStep",
    "nextStepDueDate",
    "contactName",
    "email",
];

/// Render the outreach history as CSV text.
///
/// The header row is bare; every value is double-quoted with embedded
/// quotes doubled, and missing values export as `""`. Lines end in `\n`.
/// Errors with [`IoError::Empty`] when there is nothing to export.
pub fn export_outreach(logs: &[OutreachLog]) -> Result<String, IoError> {
    if logs.is_empty() {
        return Err(IoError::Empty("no outreach logs to export".to_string()));
    }

    let mut out = EXPORT_HEADERS.join(",");
    out.push('\n');

    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(::csv::QuoteStyle::Always)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for log in logs {
        writer.serialize(log)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| IoError::Io(e.error().to_string()))?;
    out.push_str(&String::from_utf8_lossy(&bytes));
    Ok(out)
}

/// Write [`export_outreach`] output to `path`.
pub fn write_outreach_export(logs: &[OutreachLog], path: &Path) -> Result<(), IoError> {
    let content = export_outreach(logs)?;
    std::fs::write(path, content).map_err(|e| IoError::Io(format!("{}: {e}", path.display())))?;
    log::info!("exported {} outreach logs to {}", logs.len(), path.display());
    Ok(())
}

/// `outreach_export_<YYYY-MM-DD>.csv`
pub fn default_export_filename(today: NaiveDate) -> String {
    format!("outreach_export_{}.csv", today.format("%Y-%m-%d"))
}
