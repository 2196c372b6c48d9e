// Delta-time derivation over the whole log
use crate::domain::measurement::{Measurement, TimedMeasurement};

/// Annotate each measurement with the seconds elapsed since the previous one.
///
/// Deltas run across cycle boundaries; only the first measurement of the log
/// has no predecessor and gets `None`.
pub fn derive_delta_times(measurements: &[Measurement]) -> Vec<TimedMeasurement> {
    let mut previous_time: Option<i64> = None;

    measurements
        .iter()
        .map(|m| {
            // difference taken in f64 so extreme timestamps cannot overflow
            let dt = previous_time.map(|prev| (m.test_time as f64 - prev as f64) / 1000.0);
            previous_time = Some(m.test_time);
            TimedMeasurement {
                measurement: m.clone(),
                dt,
            }
        })
        .collect()
}
