// Domain layer - measurement, cycle and chart models
pub mod chart;
pub mod cycle;
pub mod measurement;
