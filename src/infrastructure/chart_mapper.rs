// Mapper to convert cycle summaries to chart series
use crate::domain::chart::{ChartData, ChartGrid, CyclePoint};
use crate::domain::cycle::{AggregatedCycle, AGGREGATE_FIELDS};

pub fn cycles_to_chart_grid(cycles: &[AggregatedCycle]) -> ChartGrid {
    let charts: Vec<ChartData> = AGGREGATE_FIELDS
        .iter()
        .enumerate()
        .map(|(idx, (key, title))| field_to_chart(cycles, idx, key, title))
        .collect();

    ChartGrid::new(charts)
}

fn field_to_chart(cycles: &[AggregatedCycle], idx: usize, key: &str, title: &str) -> ChartData {
    // cycles without a value (e.g. no CC ratio) leave a gap
    let points: Vec<CyclePoint> = cycles
        .iter()
        .filter_map(|c| c.field(key).map(|value| CyclePoint::new(c.cycle, value)))
        .collect();

    ChartData::new(
        key.to_string(),
        title.to_string(),
        idx / ChartGrid::COLS,
        idx % ChartGrid::COLS,
        points,
    )
}
