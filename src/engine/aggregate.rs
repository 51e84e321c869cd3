use arrow::array::{Array, Float64Array};
use arrow_arith::aggregate::{max, min, sum};

use crate::models::TemperatureSummary;

/// Min, max and arithmetic mean over the non-null temperatures.
pub fn summarize(temperatures: &Float64Array) -> TemperatureSummary {
    let observed = temperatures.len() - temperatures.null_count();
    if observed == 0 {
        return TemperatureSummary::default();
    }

    TemperatureSummary {
        min: min(temperatures),
        max: max(temperatures),
        avg: sum(temperatures).map(|total| total / observed as f64),
    }
}
