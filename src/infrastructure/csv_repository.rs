// CSV log repository implementation
use crate::application::error::AnalysisError;
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::measurement::Measurement;
use async_trait::async_trait;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;

const REQUIRED_COLUMNS: [&str; 5] = ["test_time", "test_cur", "test_vol", "cycle", "step_type"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    test_time: Option<i64>,
    test_cur: Option<f64>,
    test_vol: Option<f64>,
    cycle: Option<i64>,
    step_type: Option<i64>,
}

fn require<T>(value: Option<T>, row: usize, field: &str) -> Result<T, AnalysisError> {
    value.ok_or_else(|| AnalysisError::input_schema(row, field, "is missing"))
}

/// `NaN` and `inf` parse as floats but carry no measurement.
fn require_finite(value: Option<f64>, row: usize, field: &str) -> Result<f64, AnalysisError> {
    let value = require(value, row, field)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::input_schema(row, field, "is not numeric"))
    }
}

impl CsvRow {
    fn into_measurement(self, row: usize) -> Result<Measurement, AnalysisError> {
        Ok(Measurement::new(
            require(self.test_time, row, "test_time")?,
            require_finite(self.test_cur, row, "test_cur")?,
            require_finite(self.test_vol, row, "test_vol")?,
            require(self.cycle, row, "cycle")?,
            require(self.step_type, row, "step_type")?,
        ))
    }
}

/// Parse a cycler log with a header row. Columns are matched by name; extra columns are ignored.
///
/// Rows are numbered from 1, not counting the header.
pub fn parse_measurements(input: &[u8]) -> Result<Vec<Measurement>, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AnalysisError::input_schema(0, column, "column not found"));
        }
    }

    let mut measurements = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| {
            if let csv::ErrorKind::Deserialize { err, .. } = e.kind() {
                let field = err
                    .field()
                    .and_then(|i| headers.get(i as usize))
                    .unwrap_or("?")
                    .to_string();
                return AnalysisError::input_schema(row, field, "is not numeric");
            }
            AnalysisError::Csv(e)
        })?;
        measurements.push(record.into_measurement(row)?);
    }

    Ok(measurements)
}

#[derive(Debug, Clone)]
pub struct CsvMeasurementRepository {
    log_dir: PathBuf,
}

impl CsvMeasurementRepository {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    fn log_path(&self, log_id: &str) -> Option<PathBuf> {
        let valid = !log_id.is_empty()
            && !log_id.contains(['/', '\\'])
            && !log_id.contains("..");
        valid.then(|| self.log_dir.join(format!("{}.csv", log_id)))
    }
}

#[async_trait]
impl MeasurementRepository for CsvMeasurementRepository {
    async fn list_log_ids(&self) -> Result<Vec<String>, AnalysisError> {
        let mut entries = tokio::fs::read_dir(&self.log_dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        tracing::debug!("Found {} logs in {}", ids.len(), self.log_dir.display());
        Ok(ids)
    }

    async fn load_measurements(&self, log_id: &str) -> Result<Vec<Measurement>, AnalysisError> {
        let path = self
            .log_path(log_id)
            .ok_or_else(|| AnalysisError::LogNotFound(log_id.to_string()))?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AnalysisError::LogNotFound(log_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        parse_measurements(&bytes).inspect_err(|e| {
            tracing::warn!("Rejected log {}: {}", log_id, e);
        })
    }
}
