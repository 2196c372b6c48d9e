// Measurement domain model - one row of a cycler log
use serde::Serialize;
use std::fmt;

/// Identifier shared by all measurements of one charge/discharge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CycleId(pub i64);

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Test-procedure step code reported by the cycler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepType(pub i64);

impl StepType {
    pub const CC_CHARGE: StepType = StepType(1);
    pub const DISCHARGE: StepType = StepType(2);
    pub const REST: StepType = StepType(4);
    pub const ALT_CHARGE: StepType = StepType(7);

    pub fn is_charge(self) -> bool {
        self == Self::CC_CHARGE || self == Self::ALT_CHARGE
    }

    pub fn is_discharge(self) -> bool {
        self == Self::DISCHARGE
    }

    pub fn is_rest(self) -> bool {
        self == Self::REST
    }
}

/// Phase of a measurement, decided by the sign of its current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Charge,
    Discharge,
    Rest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Milliseconds since test start, non-decreasing.
    pub test_time: i64,
    /// Signed current in mA.
    pub test_cur: f64,
    /// Volts.
    pub test_vol: f64,
    pub cycle: CycleId,
    pub step_type: StepType,
}

impl Measurement {
    pub fn new(test_time: i64, test_cur: f64, test_vol: f64, cycle: i64, step_type: i64) -> Self {
        Self {
            test_time,
            test_cur,
            test_vol,
            cycle: CycleId(cycle),
            step_type: StepType(step_type),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.test_cur > 0.0 {
            Phase::Charge
        } else if self.test_cur < 0.0 {
            Phase::Discharge
        } else {
            Phase::Rest
        }
    }
}

/// A measurement annotated with the elapsed time since its predecessor in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedMeasurement {
    pub measurement: Measurement,
    /// Seconds; `None` for the first measurement of the log.
    pub dt: Option<f64>,
}

impl TimedMeasurement {
    /// Contribution of this sample's interval to a time-weighted sum.
    pub fn dt_or_zero(&self) -> f64 {
        self.dt.unwrap_or(0.0)
    }
}
