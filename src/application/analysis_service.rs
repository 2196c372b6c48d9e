// Analysis service - Use cases for summarising cycler logs
use crate::application::cycle_aggregator::{aggregate_cycle, aggregate_cycles, group_by_cycle};
use crate::application::delta_time::derive_delta_times;
use crate::application::error::AnalysisError;
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::chart::ChartGrid;
use crate::domain::cycle::AggregatedCycle;
use crate::domain::measurement::Measurement;
use crate::infrastructure::chart_mapper::cycles_to_chart_grid;
use std::sync::Arc;

#[derive(Clone)]
pub struct CycleAnalysisService {
    repository: Arc<dyn MeasurementRepository>,
    parallel: bool,
}

impl CycleAnalysisService {
    pub fn new(repository: Arc<dyn MeasurementRepository>, parallel: bool) -> Self {
        Self {
            repository,
            parallel,
        }
    }

    pub async fn list_logs(&self) -> Result<Vec<String>, AnalysisError> {
        self.repository.list_log_ids().await
    }

    pub async fn analyze_log(&self, log_id: &str) -> Result<Vec<AggregatedCycle>, AnalysisError> {
        let measurements = self.repository.load_measurements(log_id).await?;
        tracing::info!("Loaded {} measurements from log {}", measurements.len(), log_id);
        self.analyze(measurements).await
    }

    pub async fn chart_log(&self, log_id: &str) -> Result<ChartGrid, AnalysisError> {
        let cycles = self.analyze_log(log_id).await?;
        Ok(cycles_to_chart_grid(&cycles))
    }

    pub async fn analyze(
        &self,
        measurements: Vec<Measurement>,
    ) -> Result<Vec<AggregatedCycle>, AnalysisError> {
        if self.parallel {
            aggregate_in_parallel(measurements).await
        } else {
            Ok(aggregate_cycles(&measurements))
        }
    }
}

/// Aggregate each cycle on a blocking worker and merge results in first-appearance order.
async fn aggregate_in_parallel(
    measurements: Vec<Measurement>,
) -> Result<Vec<AggregatedCycle>, AnalysisError> {
    let groups = group_by_cycle(derive_delta_times(&measurements));
    tracing::debug!("Aggregating {} cycles on worker tasks", groups.len());

    let handles = groups
        .into_iter()
        .map(|group| tokio::task::spawn_blocking(move || aggregate_cycle(&group)));

    // join_all yields in the order the handles were created
    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(|e| AnalysisError::Worker(e.to_string())))
        .collect()
}
