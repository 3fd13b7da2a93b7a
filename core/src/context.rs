//! Process-lifetime dashboard context.
//!
//! Holds the config and the seed, and generates the base dataset at
//! most once. The dataset is shared read-only behind an Arc; every
//! query borrows it and derives a fresh filtered view.

use crate::{
    agents::{self, AgentStats},
    aggregate::{self, Granularity, KpiSummary, PeriodSummary},
    config::DashboardConfig,
    error::KpiResult,
    export,
    filter::filter_range,
    generator::{Dataset, KpiGenerator},
    record::DailyRecord,
    types::{Day, Seed},
};
use std::io::Write;
use std::sync::{Arc, OnceLock};

pub struct DashboardContext {
    config:    DashboardConfig,
    generator: KpiGenerator,
    seed:      Seed,
    dataset:   OnceLock<Arc<Dataset>>,
}

impl DashboardContext {
    pub fn new(config: DashboardConfig, seed: Seed) -> KpiResult<Self> {
        let generator = KpiGenerator::new(config.generator.clone())?;
        Ok(Self {
            config,
            generator,
            seed,
            dataset: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// The base dataset, generated on first access.
    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(self.dataset.get_or_init(|| {
            log::info!("Generating base dataset (seed={})", self.seed);
            Arc::new(self.generator.generate(self.seed))
        }))
    }

    /// Owned copy of the records in `[start, end]`.
    pub fn query(&self, start: Day, end: Day) -> Vec<DailyRecord> {
        let dataset = self.dataset();
        let selected = filter_range(dataset.records(), start, end).to_vec();
        log::debug!("query {start}..={end}: {} record(s)", selected.len());
        selected
    }

    pub fn summary(&self, start: Day, end: Day) -> KpiResult<KpiSummary> {
        let dataset = self.dataset();
        aggregate::summarize(
            filter_range(dataset.records(), start, end),
            self.config.service_level_target,
        )
    }

    pub fn rollup(&self, start: Day, end: Day, granularity: Granularity) -> KpiResult<Vec<PeriodSummary>> {
        let dataset = self.dataset();
        aggregate::rollup(
            filter_range(dataset.records(), start, end),
            granularity,
            self.config.service_level_target,
        )
    }

    /// Write the selection as CSV; returns the number of data rows.
    pub fn export_csv<W: Write>(&self, start: Day, end: Day, writer: W) -> KpiResult<usize> {
        let dataset = self.dataset();
        export::write_csv(filter_range(dataset.records(), start, end), writer)
    }

    /// Agent ranking from the configured roster, optionally one agent only.
    pub fn agent_ranking(&self, agent: Option<&str>) -> KpiResult<Vec<AgentStats>> {
        agents::ranking(&self.config.agents, agent)
    }
}
