//! CSV export of a filtered selection.
//!
//! Format: one header row of field names, then one comma-separated
//! row per record. Dates are ISO-8601 (YYYY-MM-DD).

use crate::{
    error::{KpiError, KpiResult},
    record::DailyRecord,
    types::Day,
};
use serde::Serialize;
use std::io::Write;

pub const CSV_HEADER: [&str; 9] = [
    "date",
    "service_level",
    "calls_total",
    "calls_handled",
    "avg_handle_time",
    "avg_wait_time",
    "policies_sold",
    "quotes_issued",
    "conversion_rate",
];

#[derive(Serialize)]
struct ExportRow {
    date:            Day,
    service_level:   f64,
    calls_total:     u32,
    calls_handled:   u32,
    avg_handle_time: f64,
    avg_wait_time:   f64,
    policies_sold:   u32,
    quotes_issued:   u32,
    conversion_rate: f64,
}

impl ExportRow {
    fn from_record(r: &DailyRecord) -> KpiResult<Self> {
        Ok(Self {
            date:            r.date,
            service_level:   r.service_level,
            calls_total:     r.calls_total,
            calls_handled:   r.calls_handled,
            avg_handle_time: r.avg_handle_time,
            avg_wait_time:   r.avg_wait_time,
            policies_sold:   r.policies_sold,
            quotes_issued:   r.quotes_issued,
            conversion_rate: r.conversion_rate()?,
        })
    }
}

/// Write `records` as CSV. Returns the number of data rows written.
/// The header is written even when the selection is empty.
pub fn write_csv<W: Write>(records: &[DailyRecord], writer: W) -> KpiResult<usize> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for r in records {
        out.serialize(ExportRow::from_record(r)?)?;
    }
    out.flush()?;
    Ok(records.len())
}

pub fn to_csv_string(records: &[DailyRecord]) -> KpiResult<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| KpiError::Other(e.into()))
}

/// Download file name for a selection, e.g. `kpi_data_2024-03-01_2024-03-31.csv`.
pub fn file_name(start: Day, end: Day) -> String {
    format!("kpi_data_{start}_{end}.csv")
}
