use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::planner::QualificationRecord;

pub const EXPORT_FILE_NAME: &str = "qualifications.csv";

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Team")]
    team: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End")]
    end: String,
    #[serde(rename = "Environment")]
    environment: &'a str,
    #[serde(rename = "Deployed")]
    deployed: bool,
}

impl<'a> From<&'a QualificationRecord> for ExportRow<'a> {
    fn from(record: &'a QualificationRecord) -> Self {
        Self {
            name: &record.name,
            team: &record.team,
            description: record.description_text(),
            start: record.start_date.format("%Y-%m-%d").to_string(),
            end: record.end_date.format("%Y-%m-%d").to_string(),
            environment: record.environment.name(),
            deployed: record.deployed,
        }
    }
}

/// Header row plus one row per record, in list order
pub fn write_csv<W: Write>(records: &[QualificationRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(ExportRow::from(record))
            .with_context(|| format!("Failed to write row for {}", record.name))?;
    }
    // An empty list still gets a header
    if records.is_empty() {
        writer.write_record(["Name", "Team", "Description", "Start", "End", "Environment", "Deployed"])?;
    }
    writer.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Export every record to `<dir>/qualifications.csv`
/// Returns the path of the created file on success
pub fn export_csv(records: &[QualificationRecord], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let file_path = dir.join(EXPORT_FILE_NAME);
    let file = fs::File::create(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;
    write_csv(records, file)?;

    tracing::info!(path = %file_path.display(), count = records.len(), "exported qualifications");
    Ok(file_path)
}
