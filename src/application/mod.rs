// Application layer - use cases over the cycle aggregation core
pub mod analysis_service;
pub mod cycle_aggregator;
pub mod delta_time;
pub mod error;
pub mod measurement_repository;
pub mod rest_runs;
pub mod streaming_service;
