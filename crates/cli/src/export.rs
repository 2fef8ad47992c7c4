//! `fplan export`: normalize an outreach log and write it back out as CSV.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use fieldplan_engine::normalize::normalize_outreach;
use fieldplan_io::{default_export_filename, export_outreach, write_outreach_export};

use crate::inputs::{resolve_today, rng_from_seed};
use crate::CliError;

pub fn cmd_export(
    outreach: PathBuf,
    output: Option<PathBuf>,
    today: Option<NaiveDate>,
    seed: Option<u64>,
) -> Result<(), CliError> {
    let today = resolve_today(today);
    let rows = fieldplan_io::read_rows(&outreach)?;
    let logs = normalize_outreach(&rows, today, &mut rng_from_seed(seed));

    let path = output.unwrap_or_else(|| PathBuf::from(default_export_filename(today)));
    if path.is_dir() {
        return Err(CliError::usage(format!("--output {} is a directory", path.display()))
            .with_hint(format!("e.g. --output {}", path.join(default_export_filename(today)).display())));
    }
    if path == Path::new("-") {
        let text = export_outreach(&logs)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .map_err(|e| CliError::general(e.to_string()))?;
        return Ok(());
    }

    write_outreach_export(&logs, &path)?;
    eprintln!("wrote {} logs to {}", logs.len(), path.display());
    Ok(())
}
