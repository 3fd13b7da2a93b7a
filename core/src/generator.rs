//! KPI dataset generator.
//!
//! Produces one DailyRecord per calendar day of the configured period.
//! Every numeric field draws from its own RNG stream (see rng.rs), so
//! the dataset is a pure function of (config, seed).

use crate::{
    config::{CallsHandledPolicy, GeneratorConfig},
    error::KpiResult,
    record::DailyRecord,
    rng::{MetricSlot, RngBank},
    types::{Day, Seed},
};

/// An immutable, date-ordered daily series.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    seed:    Seed,
    records: Vec<DailyRecord>,
}

impl Dataset {
    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<Day> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<Day> {
        self.records.last().map(|r| r.date)
    }
}

impl AsRef<[DailyRecord]> for Dataset {
    fn as_ref(&self) -> &[DailyRecord] {
        &self.records
    }
}

pub struct KpiGenerator {
    config: GeneratorConfig,
}

impl KpiGenerator {
    /// Build a generator; the config is validated once here so that
    /// generate() itself cannot fail.
    pub fn new(config: GeneratorConfig) -> KpiResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self, seed: Seed) -> Dataset {
        let c = &self.config;
        let bank = RngBank::new(seed);
        let mut service_level   = bank.for_metric(MetricSlot::ServiceLevel);
        let mut calls_total     = bank.for_metric(MetricSlot::CallsTotal);
        let mut calls_handled   = bank.for_metric(MetricSlot::CallsHandled);
        let mut avg_handle_time = bank.for_metric(MetricSlot::AvgHandleTime);
        let mut avg_wait_time   = bank.for_metric(MetricSlot::AvgWaitTime);
        let mut policies_sold   = bank.for_metric(MetricSlot::PoliciesSold);
        let mut quotes_issued   = bank.for_metric(MetricSlot::QuotesIssued);

        let mut records = Vec::with_capacity(c.day_count());
        let mut clamped = 0usize;

        for date in c.period_start.iter_days().take_while(|d| *d <= c.period_end) {
            let total = calls_total.uniform_int(c.calls_total.min, c.calls_total.max);
            let mut handled = calls_handled.uniform_int(c.calls_handled.min, c.calls_handled.max);
            if c.calls_handled_policy == CallsHandledPolicy::ClampToTotal && handled > total {
                handled = total;
                clamped += 1;
            }

            records.push(DailyRecord {
                date,
                service_level:   service_level.uniform(c.service_level.min, c.service_level.max),
                calls_total:     total,
                calls_handled:   handled,
                avg_handle_time: avg_handle_time.uniform(c.avg_handle_time.min, c.avg_handle_time.max),
                avg_wait_time:   avg_wait_time.uniform(c.avg_wait_time.min, c.avg_wait_time.max),
                policies_sold:   policies_sold.uniform_int(c.policies_sold.min, c.policies_sold.max),
                quotes_issued:   quotes_issued.uniform_int(c.quotes_issued.min, c.quotes_issued.max),
            });
        }

        log::debug!(
            "Generated {} daily records for {}..={} (seed={seed}, clamped_handled={clamped})",
            records.len(),
            c.period_start,
            c.period_end
        );

        Dataset { seed, records }
    }
}

impl Default for KpiGenerator {
    fn default() -> Self {
        Self { config: GeneratorConfig::default() }
    }
}

/// Generate the default 2024 dataset for `seed`.
pub fn generate_dataset(seed: Seed) -> Dataset {
    KpiGenerator::default().generate(seed)
}
