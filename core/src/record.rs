//! The daily KPI record and its derived metrics.

use crate::{
    error::{KpiError, KpiResult},
    types::Day,
};
use serde::{Deserialize, Serialize};

/// One simulated day of call-center activity.
///
/// `conversion_rate` is not a field: it is always derived from
/// `policies_sold` and `quotes_issued`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    pub date:            Day,
    /// Percent of calls answered within the target threshold.
    pub service_level:   f64,
    pub calls_total:     u32,
    pub calls_handled:   u32,
    /// TMO, minutes.
    pub avg_handle_time: f64,
    /// TMA, minutes.
    pub avg_wait_time:   f64,
    pub policies_sold:   u32,
    pub quotes_issued:   u32,
}

impl DailyRecord {
    /// Policies sold per quote issued, as a percentage.
    pub fn conversion_rate(&self) -> KpiResult<f64> {
        conversion_rate(self.policies_sold, self.quotes_issued)
    }

    /// TMO + TMA: total time a caller spends from queue to wrap-up.
    pub fn total_handle_time(&self) -> f64 {
        self.avg_handle_time + self.avg_wait_time
    }
}

/// `policies_sold / quotes_issued * 100`.
pub fn conversion_rate(policies_sold: u32, quotes_issued: u32) -> KpiResult<f64> {
    if quotes_issued == 0 {
        return Err(KpiError::InvalidMetric { metric: "conversion_rate" });
    }
    Ok(f64::from(policies_sold) / f64::from(quotes_issued) * 100.0)
}
