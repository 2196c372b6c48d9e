// Cycle aggregator - per-cycle summary of a measurement log
use crate::application::delta_time::derive_delta_times;
use crate::application::rest_runs::{find_rest_runs, ocv_drops};
use crate::domain::cycle::AggregatedCycle;
use crate::domain::measurement::{CycleId, Measurement, Phase, StepType, TimedMeasurement};
use std::collections::HashMap;

/// All samples of one cycle, in log order. Never empty.
#[derive(Debug, Clone)]
pub struct CycleSamples {
    cycle: CycleId,
    samples: Vec<TimedMeasurement>,
}

impl CycleSamples {
    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    pub fn samples(&self) -> &[TimedMeasurement] {
        &self.samples
    }

    fn in_phase(&self, phase: Phase) -> impl Iterator<Item = &TimedMeasurement> {
        self.samples
            .iter()
            .filter(move |s| s.measurement.phase() == phase)
    }
}

/// Group samples by cycle, keeping the order in which cycles first appear.
pub fn group_by_cycle(timed: Vec<TimedMeasurement>) -> Vec<CycleSamples> {
    let mut groups: Vec<CycleSamples> = Vec::new();
    let mut index: HashMap<CycleId, usize> = HashMap::new();

    for sample in timed {
        let cycle = sample.measurement.cycle;
        let slot = *index.entry(cycle).or_insert_with(|| {
            groups.push(CycleSamples {
                cycle,
                samples: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].samples.push(sample);
    }

    groups
}

/// Round half to even at one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[derive(Debug, Default)]
struct PhaseSums {
    current_time: f64,
    power_time: f64,
    duration: f64,
}

impl PhaseSums {
    fn over<'a>(samples: impl Iterator<Item = &'a TimedMeasurement>) -> Self {
        samples.fold(Self::default(), |mut acc, s| {
            let dt = s.dt_or_zero();
            acc.current_time += s.measurement.test_cur * dt;
            acc.power_time += s.measurement.test_vol * s.measurement.test_cur * dt;
            acc.duration += dt;
            acc
        })
    }
}

pub fn aggregate_cycle(group: &CycleSamples) -> AggregatedCycle {
    let samples = group.samples();

    let (v_min, v_max, abs_cur_max) = samples.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0_f64),
        |(lo, hi, cur), s| {
            (
                lo.min(s.measurement.test_vol),
                hi.max(s.measurement.test_vol),
                cur.max(s.measurement.test_cur.abs()),
            )
        },
    );

    let charge = PhaseSums::over(group.in_phase(Phase::Charge));
    let discharge = PhaseSums::over(group.in_phase(Phase::Discharge));

    let cc_charge_time: f64 = group
        .in_phase(Phase::Charge)
        .filter(|s| s.measurement.step_type == StepType::CC_CHARGE)
        .map(TimedMeasurement::dt_or_zero)
        .sum();

    let cc_ratio = if charge.duration > 0.0 {
        Some(round_one_decimal(100.0 * cc_charge_time / charge.duration))
    } else {
        None
    };

    let drops = ocv_drops(&find_rest_runs(samples));

    AggregatedCycle {
        cycle: group.cycle(),
        v_min,
        v_max,
        i_max: round_one_decimal(abs_cur_max / 1000.0),
        cap_chg: charge.current_time / 1000.0,
        cap_dchg: discharge.current_time / 1000.0,
        engy_chg: charge.power_time / 3600.0,
        engy_dchg: discharge.power_time / 3600.0,
        ocv_drop_chg: drops.after_charge,
        ocv_drop_dchg: drops.after_discharge,
        charge_duration: charge.duration,
        cc_ratio,
    }
}

/// Summarise a complete log, one record per cycle in order of first appearance.
pub fn aggregate_cycles(measurements: &[Measurement]) -> Vec<AggregatedCycle> {
    let groups = group_by_cycle(derive_delta_times(measurements));
    tracing::debug!(
        "Aggregating {} measurements across {} cycles",
        measurements.len(),
        groups.len()
    );
    groups.iter().map(aggregate_cycle).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    fn scenario() -> Vec<Measurement> {
        vec![
            Measurement::new(0, 0.0, 4.0, 1, 4),
            Measurement::new(1000, 500.0, 3.8, 1, 1),
            Measurement::new(2000, 500.0, 4.2, 1, 1),
            Measurement::new(3000, 0.0, 4.1, 1, 4),
            Measurement::new(4000, 0.0, 4.15, 1, 4),
        ]
    }

    fn two_cycle_log() -> Vec<Measurement> {
        vec![
            Measurement::new(0, 1000.0, 3.6, 7, 1),
            Measurement::new(2000, 1000.0, 3.9, 7, 1),
            Measurement::new(2500, 400.0, 4.2, 7, 7),
            Measurement::new(4000, 0.0, 4.2, 7, 4),
            Measurement::new(6000, 0.0, 4.1, 7, 4),
            Measurement::new(7000, -1500.0, 3.7, 7, 2),
            Measurement::new(10_000, -1500.0, 3.1, 7, 2),
            Measurement::new(11_000, 0.0, 3.1, 7, 4),
            Measurement::new(12_000, 0.0, 3.3, 7, 4),
            Measurement::new(13_000, 1200.0, 3.5, 3, 1),
            Measurement::new(14_000, 1200.0, 3.8, 3, 1),
            Measurement::new(15_000, -1260.0, 3.4, 3, 2),
        ]
    }

    #[test]
    fn test_single_cycle_scenario() {
        let result = aggregate_cycles(&scenario());
        assert_eq!(result.len(), 1);
        let c = &result[0];
        assert_eq!(c.cycle, CycleId(1));
        assert_eq!(c.v_min, 3.8);
        assert_eq!(c.v_max, 4.2);
        assert_eq!(c.i_max, 0.5);
        assert!(approx(c.charge_duration, 2.0));
        assert_eq!(c.cc_ratio, Some(100.0));
        assert!((c.ocv_drop_chg - 0.05).abs() < 1e-9);
        assert_eq!(c.ocv_drop_dchg, 0.0);
        assert!(approx(c.cap_chg, 1.0));
        assert!(approx(c.engy_chg, (3.8 * 500.0 + 4.2 * 500.0) / 3600.0));
    }

    #[test]
    fn test_rest_only_cycle() {
        let result = aggregate_cycles(&[
            Measurement::new(0, 0.0, 3.7, 1, 4),
            Measurement::new(1000, 0.0, 3.69, 1, 4),
            Measurement::new(2000, 0.0, 3.68, 1, 4),
        ]);
        let c = &result[0];
        assert_eq!(c.cap_chg, 0.0);
        assert_eq!(c.cap_dchg, 0.0);
        assert_eq!(c.engy_chg, 0.0);
        assert_eq!(c.engy_dchg, 0.0);
        assert_eq!(c.charge_duration, 0.0);
        assert_eq!(c.cc_ratio, None);
        assert_eq!(c.i_max, 0.0);
    }

    #[test]
    fn test_cycles_keep_first_appearance_order() {
        let result = aggregate_cycles(&two_cycle_log());
        let order: Vec<i64> = result.iter().map(|c| c.cycle.0).collect();
        assert_eq!(order, vec![7, 3]);
    }

    #[test]
    fn test_interleaved_cycle_ids_are_not_resorted() {
        let result = aggregate_cycles(&[
            Measurement::new(0, 100.0, 3.0, 5, 1),
            Measurement::new(1000, 100.0, 3.1, 2, 1),
            Measurement::new(2000, 100.0, 3.2, 5, 1),
        ]);
        let order: Vec<i64> = result.iter().map(|c| c.cycle.0).collect();
        assert_eq!(order, vec![5, 2]);
        assert!(approx(result[0].charge_duration, 1.0));
        assert!(approx(result[1].charge_duration, 1.0));
    }

    #[test]
    fn test_two_cycle_log_aggregates() {
        let result = aggregate_cycles(&two_cycle_log());
        let first = &result[0];

        assert_eq!(first.v_min, 3.1);
        assert_eq!(first.v_max, 4.2);
        assert_eq!(first.i_max, 1.5);
        // charge dts: None, 2.0, 0.5
        assert!(approx(first.charge_duration, 2.5));
        assert!(approx(first.cap_chg, (1000.0 * 2.0 + 400.0 * 0.5) / 1000.0));
        assert_eq!(first.cc_ratio, Some(80.0));
        // discharge dts: 1.0, 3.0
        assert!(approx(first.cap_dchg, -1500.0 * 4.0 / 1000.0));
        assert!(approx(
            first.engy_dchg,
            (3.7 * -1500.0 * 1.0 + 3.1 * -1500.0 * 3.0) / 3600.0
        ));
        assert!((first.ocv_drop_chg - (-0.1)).abs() < 1e-9);
        assert!((first.ocv_drop_dchg - 0.2).abs() < 1e-9);

        let second = &result[1];
        assert_eq!(second.i_max, 1.3);
        // the boundary sample's delta is measured from the previous cycle
        assert!(approx(second.charge_duration, 2.0));
        assert_eq!(second.cc_ratio, Some(100.0));
    }

    #[test]
    fn test_phase_partition_is_complete() {
        let groups = group_by_cycle(derive_delta_times(&two_cycle_log()));
        for group in &groups {
            let charge = group.in_phase(Phase::Charge).count();
            let discharge = group.in_phase(Phase::Discharge).count();
            let rest = group.in_phase(Phase::Rest).count();
            assert_eq!(charge + discharge + rest, group.samples().len());
        }
    }

    #[test]
    fn test_capacity_matches_direct_sum() {
        let log = two_cycle_log();
        let timed = derive_delta_times(&log);
        let expected: f64 = timed
            .iter()
            .filter(|t| t.measurement.cycle == CycleId(7) && t.measurement.test_cur > 0.0)
            .map(|t| t.measurement.test_cur * t.dt_or_zero())
            .sum::<f64>()
            / 1000.0;
        let result = aggregate_cycles(&log);
        assert!(approx(result[0].cap_chg, expected));
    }

    #[test]
    fn test_invariants_hold() {
        for c in aggregate_cycles(&two_cycle_log()) {
            assert!(c.v_min <= c.v_max);
            assert!(c.i_max >= 0.0);
            if let Some(ratio) = c.cc_ratio {
                assert!((0.0..=100.0).contains(&ratio));
            }
        }
    }

    #[test]
    fn test_single_sample_charge_has_no_ratio() {
        let result = aggregate_cycles(&[Measurement::new(0, 800.0, 3.9, 1, 1)]);
        assert_eq!(result[0].charge_duration, 0.0);
        assert_eq!(result[0].cc_ratio, None);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let log = two_cycle_log();
        let a = serde_json::to_string(&aggregate_cycles(&log)).unwrap();
        let b = serde_json::to_string(&aggregate_cycles(&log)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(0.5), 0.5);
        assert_eq!(round_one_decimal(1.26), 1.3);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(83.333333), 83.3);
    }

    #[test]
    fn test_empty_log_yields_no_cycles() {
        assert!(aggregate_cycles(&[]).is_empty());
    }
}
