//! KPI aggregation: headline summary cards and period roll-ups.
//!
//! Means are never taken over an empty selection; callers get
//! KpiError::EmptyRange and present it as "no data".

use crate::{
    error::{KpiError, KpiResult},
    record::DailyRecord,
    types::Day,
};
use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiSummary {
    pub days:                   usize,
    pub service_level_mean:     f64,
    /// Mean service level minus the target, in percentage points.
    pub service_level_delta:    f64,
    pub calls_total:            u64,
    pub calls_handled:          u64,
    pub avg_handle_time_mean:   f64,
    pub avg_wait_time_mean:     f64,
    pub total_handle_time_mean: f64,
    pub policies_sold:          u64,
    pub quotes_issued:          u64,
    /// Mean of the daily conversion rates.
    pub conversion_rate_mean:   f64,
}

pub fn summarize(records: &[DailyRecord], service_level_target: f64) -> KpiResult<KpiSummary> {
    if records.is_empty() {
        return Err(KpiError::EmptyRange);
    }
    let n = records.len() as f64;

    let mut service_level = 0.0;
    let mut handle_time = 0.0;
    let mut wait_time = 0.0;
    let mut conversion = 0.0;
    let mut calls_total = 0u64;
    let mut calls_handled = 0u64;
    let mut policies_sold = 0u64;
    let mut quotes_issued = 0u64;

    for r in records {
        service_level += r.service_level;
        handle_time += r.avg_handle_time;
        wait_time += r.avg_wait_time;
        conversion += r.conversion_rate()?;
        calls_total += u64::from(r.calls_total);
        calls_handled += u64::from(r.calls_handled);
        policies_sold += u64::from(r.policies_sold);
        quotes_issued += u64::from(r.quotes_issued);
    }

    let service_level_mean = service_level / n;
    Ok(KpiSummary {
        days: records.len(),
        service_level_mean,
        service_level_delta: service_level_mean - service_level_target,
        calls_total,
        calls_handled,
        avg_handle_time_mean: handle_time / n,
        avg_wait_time_mean: wait_time / n,
        total_handle_time_mean: (handle_time + wait_time) / n,
        policies_sold,
        quotes_issued,
        conversion_rate_mean: conversion / n,
    })
}

/// Time bucket for roll-ups.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    /// ISO week, Monday first.
    Week,
    #[default]
    Month,
}

impl Granularity {
    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: Day) -> Day {
        match self {
            Self::Day => date,
            Self::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            Self::Month => date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl FromStr for Granularity {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            other => Err(KpiError::InvalidConfig(format!("unknown granularity '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub period_start: Day,
    pub summary:      KpiSummary,
}

/// Summaries per bucket, ascending. Empty input gives an empty roll-up.
///
/// `records` must be sorted ascending by date (a Dataset always is);
/// buckets are formed from neighbouring records only.
pub fn rollup(
    records: &[DailyRecord],
    granularity: Granularity,
    service_level_target: f64,
) -> KpiResult<Vec<PeriodSummary>> {
    records
        .chunk_by(|a, b| granularity.bucket_start(a.date) == granularity.bucket_start(b.date))
        .map(|bucket| {
            Ok(PeriodSummary {
                period_start: granularity.bucket_start(bucket[0].date),
                summary: summarize(bucket, service_level_target)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> Day {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_bucket_starts_on_monday() {
        // 2024-03-14 is a Thursday.
        assert_eq!(Granularity::Week.bucket_start(d(2024, 3, 14)), d(2024, 3, 11));
        assert_eq!(Granularity::Week.bucket_start(d(2024, 3, 11)), d(2024, 3, 11));
        // 2024-01-01 is a Monday.
        assert_eq!(Granularity::Week.bucket_start(d(2024, 1, 7)), d(2024, 1, 1));
    }

    #[test]
    fn month_bucket_starts_on_first() {
        assert_eq!(Granularity::Month.bucket_start(d(2024, 2, 29)), d(2024, 2, 1));
        assert_eq!(Granularity::Day.bucket_start(d(2024, 2, 29)), d(2024, 2, 29));
    }

    #[test]
    fn granularity_parses_case_insensitively() {
        assert_eq!("Week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("monthly".parse::<Granularity>().unwrap(), Granularity::Month);
        assert!("quarter".parse::<Granularity>().is_err());
    }
}
