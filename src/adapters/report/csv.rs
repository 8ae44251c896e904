use crate::domain::result::{IterationRecord, RunResult};
use anyhow::{Context as _, Result};
use std::path::Path;

/// A row type with a fixed header, written with two-decimal floats.
pub trait CsvRecord {
    fn header() -> &'static [&'static str];

    fn record(&self) -> Vec<String>;
}

impl CsvRecord for IterationRecord {
    fn header() -> &'static [&'static str] {
        &[
            "round",
            "node",
            "marginal_gain",
            "cumulative_spread",
            "elapsed_seconds",
            "evaluations",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.round.to_string(),
            self.node.to_string(),
            format!("{:.2}", self.marginal_gain),
            format!("{:.2}", self.cumulative_spread),
            format!("{:.4}", self.elapsed_seconds),
            self.evaluations_so_far.to_string(),
        ]
    }
}

/// Write `rows` to `path` (created or truncated), header first.
pub fn write_records<R: CsvRecord>(path: &Path, rows: &[R]) -> Result<()> {
    let mut writer = ::csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer
        .write_record(R::header())
        .context("Failed to write CSV header")?;
    for row in rows {
        writer
            .write_record(row.record())
            .context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV writer")?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(())
}

/// Per-round history of one run.
pub fn write_history(path: &Path, result: &RunResult) -> Result<()> {
    write_records(path, result.history())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(u32, f64);

    impl CsvRecord for Pair {
        fn header() -> &'static [&'static str] {
            &["id", "value"]
        }

        fn record(&self) -> Vec<String> {
            vec![self.0.to_string(), format!("{:.2}", self.1)]
        }
    }

    #[test]
    fn test_write_records_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        write_records(&path, &[Pair(1, 0.5), Pair(2, 1.0 / 3.0)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id,value\n1,0.50\n2,0.33\n");
    }

    #[test]
    fn test_empty_rows_write_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_records::<Pair>(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,value\n");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("x.csv");
        let err = write_records(&path, &[Pair(1, 1.0)]).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to create CSV file"));
    }

    #[test]
    fn test_iteration_record_row() {
        let rec = IterationRecord {
            round: 2,
            node: 7,
            marginal_gain: 1.256,
            cumulative_spread: 9.0,
            elapsed_seconds: 0.5,
            evaluations_so_far: 31,
        };
        assert_eq!(IterationRecord::header().len(), rec.record().len());
        assert_eq!(rec.record(), vec!["2", "7", "1.26", "9.00", "0.5000", "31"]);
    }
}
