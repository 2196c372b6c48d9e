// Rest-run grouping and OCV drop extraction
use crate::domain::measurement::{StepType, TimedMeasurement};

/// A maximal block of adjacent rest samples (zero current, rest step) within a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestRun {
    /// Position of the first sample in the cycle.
    pub start: usize,
    /// Position of the last sample in the cycle.
    pub end: usize,
    /// Step type of the sample right before the run; `None` if the run opens the cycle.
    pub preceding_step: Option<StepType>,
    pub first_vol: f64,
    pub last_vol: f64,
}

impl RestRun {
    fn open(position: usize, preceding_step: Option<StepType>, vol: f64) -> Self {
        Self {
            start: position,
            end: position,
            preceding_step,
            first_vol: vol,
            last_vol: vol,
        }
    }

    pub fn voltage_delta(&self) -> f64 {
        self.last_vol - self.first_vol
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OcvDrops {
    pub after_charge: f64,
    pub after_discharge: f64,
}

fn is_rest_sample(sample: &TimedMeasurement) -> bool {
    sample.measurement.test_cur == 0.0 && sample.measurement.step_type.is_rest()
}

/// Split a cycle's samples into rest runs, in order of occurrence.
///
/// A run is closed as soon as a sample that is not a rest sample shows up, so
/// two rest samples share a run only if they sit next to each other in the
/// unfiltered cycle.
pub fn find_rest_runs(cycle: &[TimedMeasurement]) -> Vec<RestRun> {
    let mut runs = Vec::new();
    let mut current: Option<RestRun> = None;
    let mut previous_step: Option<StepType> = None;

    for (position, sample) in cycle.iter().enumerate() {
        let vol = sample.measurement.test_vol;

        if is_rest_sample(sample) {
            let adjacent = current.is_some_and(|run| run.end + 1 == position);
            if adjacent {
                if let Some(run) = current.as_mut() {
                    run.end = position;
                    run.last_vol = vol;
                }
            } else if let Some(run) = current.replace(RestRun::open(position, previous_step, vol)) {
                runs.push(run);
            }
        } else if let Some(run) = current.take() {
            runs.push(run);
        }

        previous_step = Some(sample.measurement.step_type);
    }

    if let Some(run) = current {
        runs.push(run);
    }

    runs
}

/// Derive the OCV drops from a cycle's rest runs.
///
/// The charge-side drop is taken from the last run that follows a charge step.
/// The discharge-side drop is taken from the first run following a discharge
/// step, and only while it is still exactly zero.
pub fn ocv_drops(runs: &[RestRun]) -> OcvDrops {
    let mut drops = OcvDrops::default();

    for run in runs {
        match run.preceding_step {
            Some(step) if step.is_charge() => {
                drops.after_charge = run.voltage_delta();
            }
            Some(step) if step.is_discharge() => {
                if drops.after_discharge == 0.0 {
                    drops.after_discharge = run.voltage_delta();
                }
            }
            _ => {}
        }
    }

    drops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::measurement::Measurement;

    fn cycle(rows: &[(f64, f64, i64)]) -> Vec<TimedMeasurement> {
        rows.iter()
            .enumerate()
            .map(|(i, &(cur, vol, step))| TimedMeasurement {
                measurement: Measurement::new(i as i64 * 1000, cur, vol, 1, step),
                dt: Some(1.0),
            })
            .collect()
    }

    #[test]
    fn test_adjacent_rest_samples_form_one_run() {
        let samples = cycle(&[
            (500.0, 4.2, 1),
            (0.0, 4.1, 4),
            (0.0, 4.05, 4),
            (0.0, 4.0, 4),
        ]);
        let runs = find_rest_runs(&samples);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].start, 1);
        assert_eq!(runs[0].end, 3);
        assert_eq!(runs[0].preceding_step, Some(StepType::CC_CHARGE));
        assert!((runs[0].voltage_delta() - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_current_on_other_step_splits_runs() {
        let samples = cycle(&[
            (0.0, 4.0, 4),
            (0.0, 4.0, 3),
            (0.0, 3.9, 4),
        ]);
        let runs = find_rest_runs(&samples);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].preceding_step, None);
        assert_eq!(runs[1].preceding_step, Some(StepType(3)));
        assert_eq!(ocv_drops(&runs), OcvDrops::default());
    }

    #[test]
    fn test_no_rest_samples_yields_default_drops() {
        let samples = cycle(&[(500.0, 4.0, 1), (-500.0, 3.5, 2)]);
        let runs = find_rest_runs(&samples);
        assert!(runs.is_empty());
        assert_eq!(ocv_drops(&runs), OcvDrops::default());
    }

    #[test]
    fn test_charge_drop_keeps_last_qualifying_run() {
        let samples = cycle(&[
            (500.0, 4.0, 1),
            (0.0, 4.0, 4),
            (0.0, 3.9, 4),
            (500.0, 4.1, 7),
            (0.0, 4.1, 4),
            (0.0, 4.05, 4),
        ]);
        let drops = ocv_drops(&find_rest_runs(&samples));
        assert!((drops.after_charge - (-0.05)).abs() < 1e-12);
        assert_eq!(drops.after_discharge, 0.0);
    }

    #[test]
    fn test_discharge_drop_keeps_first_nonzero_run() {
        let samples = cycle(&[
            (-500.0, 3.2, 2),
            (0.0, 3.2, 4),
            (0.0, 3.4, 4),
            (-500.0, 3.1, 2),
            (0.0, 3.1, 4),
            (0.0, 3.6, 4),
        ]);
        let drops = ocv_drops(&find_rest_runs(&samples));
        assert!((drops.after_discharge - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_discharge_drop_replaced_while_still_zero() {
        let samples = cycle(&[
            (-500.0, 3.2, 2),
            (0.0, 3.3, 4),
            (-500.0, 3.1, 2),
            (0.0, 3.1, 4),
            (0.0, 3.4, 4),
        ]);
        let drops = ocv_drops(&find_rest_runs(&samples));
        assert!((drops.after_discharge - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_run_opening_the_cycle_is_ignored() {
        let samples = cycle(&[(0.0, 4.0, 4), (0.0, 3.0, 4)]);
        let runs = find_rest_runs(&samples);
        assert_eq!(runs.len(), 1);
        assert_eq!(ocv_drops(&runs), OcvDrops::default());
    }
}
