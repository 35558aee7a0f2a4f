//! Diagnostic CSV reports of processes lacking gangue or overburden

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::IntensityError;
use crate::rules::GapFillReport;

pub const REPORT_HEADER: &str = "Processname";

/// Write `missing_overburden.csv`, `missing_gangue.csv` and
/// `missing_outside.csv` into `dir`, one process name per row.
pub fn write_missing_csvs(dir: &Path, report: &GapFillReport) -> Result<Vec<PathBuf>, IntensityError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(3);
    for (file, names) in [
        ("missing_overburden.csv", &report.missing_overburden),
        ("missing_gangue.csv", &report.missing_gangue),
        ("missing_outside.csv", &report.missing_outside),
    ] {
        let path = dir.join(file);
        write_names(&path, names)?;
        info!(path = %path.display(), rows = names.len(), "Report written");
        written.push(path);
    }
    Ok(written)
}

fn write_names(path: &Path, names: &BTreeSet<String>) -> Result<(), IntensityError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([REPORT_HEADER])?;
    for name in names {
        writer.write_record([name])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_quote_names_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = GapFillReport::default();
        report
            .missing_gangue
            .insert("copper mine operation and beneficiation, sulfide ore | copper".to_string());

        let paths = write_missing_csvs(dir.path(), &report).unwrap();
        assert_eq!(paths.len(), 3);

        let gangue = std::fs::read_to_string(dir.path().join("missing_gangue.csv")).unwrap();
        assert_eq!(
            gangue,
            "Processname\n\"copper mine operation and beneficiation, sulfide ore | copper\"\n"
        );
        let outside = std::fs::read_to_string(dir.path().join("missing_outside.csv")).unwrap();
        assert_eq!(outside, "Processname\n");
    }
}
