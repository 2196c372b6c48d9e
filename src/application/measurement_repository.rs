// Repository trait for cycler log access
use crate::application::error::AnalysisError;
use crate::domain::measurement::Measurement;
use async_trait::async_trait;

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// List the ids of all logs that can be analysed
    async fn list_log_ids(&self) -> Result<Vec<String>, AnalysisError>;

    /// Load every measurement of a log, in recorded order
    async fn load_measurements(&self, log_id: &str) -> Result<Vec<Measurement>, AnalysisError>;
}
