// Chart data domain models - per-cycle series handed to a plotting client
use super::measurement::CycleId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CyclePoint {
    pub cycle: CycleId,
    pub value: f64,
}

impl CyclePoint {
    pub fn new(cycle: CycleId, value: f64) -> Self {
        Self { cycle, value }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    /// Aggregate key, e.g. `Cap_Chg`.
    pub id: String,
    pub title: String,
    pub row: usize,
    pub col: usize,
    pub points: Vec<CyclePoint>,
}

impl ChartData {
    pub fn new(id: String, title: String, row: usize, col: usize, points: Vec<CyclePoint>) -> Self {
        Self {
            id,
            title,
            row,
            col,
            points,
        }
    }
}

/// Line charts laid out row-major on a fixed grid; cells past `charts.len()` stay empty.
#[derive(Debug, Clone, Serialize)]
pub struct ChartGrid {
    pub rows: usize,
    pub cols: usize,
    pub charts: Vec<ChartData>,
}

impl ChartGrid {
    pub const ROWS: usize = 4;
    pub const COLS: usize = 3;

    pub fn new(charts: Vec<ChartData>) -> Self {
        Self {
            rows: Self::ROWS,
            cols: Self::COLS,
            charts,
        }
    }

    pub fn unused_cells(&self) -> usize {
        (self.rows * self.cols).saturating_sub(self.charts.len())
    }
}
