// Aggregated cycle domain model
use super::measurement::CycleId;
use serde::Serialize;

/// Summary of one charge/discharge cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedCycle {
    #[serde(rename = "Cycle")]
    pub cycle: CycleId,
    #[serde(rename = "Vmin")]
    pub v_min: f64,
    #[serde(rename = "Vmax")]
    pub v_max: f64,
    /// Amps, one decimal.
    #[serde(rename = "Imax")]
    pub i_max: f64,
    #[serde(rename = "Cap_Chg")]
    pub cap_chg: f64,
    #[serde(rename = "Cap_DChg")]
    pub cap_dchg: f64,
    /// Watt-hours.
    #[serde(rename = "Engy_Chg")]
    pub engy_chg: f64,
    #[serde(rename = "Engy_DChg")]
    pub engy_dchg: f64,
    #[serde(rename = "OCV_Drop_Chg")]
    pub ocv_drop_chg: f64,
    #[serde(rename = "OCV_Drop_DChg")]
    pub ocv_drop_dchg: f64,
    /// Seconds.
    #[serde(rename = "Charge_Duration")]
    pub charge_duration: f64,
    /// Percent of charge time in constant-current mode; `None` when nothing was charged.
    #[serde(rename = "CC_Ratio")]
    pub cc_ratio: Option<f64>,
}

/// Names of the plottable aggregates, in grid order, with their chart titles.
pub const AGGREGATE_FIELDS: [(&str, &str); 11] = [
    ("Vmin", "Minimal Voltage"),
    ("Vmax", "Maximal Voltage"),
    ("Imax", "Max Current"),
    ("Cap_Chg", "Cap Charge"),
    ("Cap_DChg", "Cap Discharge"),
    ("Engy_Chg", "Energy Charge"),
    ("Engy_DChg", "Energy Discharge"),
    ("OCV_Drop_Chg", "OCV Drop Charge"),
    ("OCV_Drop_DChg", "OCV Drop Discharge"),
    ("Charge_Duration", "Charge Duration"),
    ("CC_Ratio", "CC Ratio"),
];

impl AggregatedCycle {
    /// Look up an aggregate by its serialized name.
    pub fn field(&self, key: &str) -> Option<f64> {
        match key {
            "Vmin" => Some(self.v_min),
            "Vmax" => Some(self.v_max),
            "Imax" => Some(self.i_max),
            "Cap_Chg" => Some(self.cap_chg),
            "Cap_DChg" => Some(self.cap_dchg),
            "Engy_Chg" => Some(self.engy_chg),
            "Engy_DChg" => Some(self.engy_dchg),
            "OCV_Drop_Chg" => Some(self.ocv_drop_chg),
            "OCV_Drop_DChg" => Some(self.ocv_drop_dchg),
            "Charge_Duration" => Some(self.charge_duration),
            "CC_Ratio" => self.cc_ratio,
            _ => None,
        }
    }
}
