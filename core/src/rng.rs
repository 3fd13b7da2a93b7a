//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through MetricRng instances derived
//! from the single master seed of a dataset.
//!
//! Each metric gets its own RNG stream, seeded deterministically
//! from (master_seed XOR metric_index). This means:
//!   - Adding a new metric never changes existing metrics' streams.
//!   - Each metric's stream is fully reproducible in isolation.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::types::Seed;

/// A named, deterministic RNG for a single metric.
pub struct MetricRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl MetricRng {
    /// Create a metric RNG from the master seed and a stable
    /// metric index. The index must never change once assigned.
    pub fn new(master_seed: Seed, metric_index: u64) -> Self {
        let derived_seed = master_seed ^ (metric_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform float in [low, high).
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Uniform integer in [low, high). Callers validate `low < high`.
    pub fn uniform_int(&mut self, low: u32, high: u32) -> u32 {
        low + self.next_u64_below(u64::from(high - low)) as u32
    }
}

/// All metric RNGs for a single dataset, indexed by stable slot.
pub struct RngBank {
    master_seed: Seed,
}

impl RngBank {
    pub fn new(master_seed: Seed) -> Self {
        Self { master_seed }
    }

    pub fn for_metric(&self, slot: MetricSlot) -> MetricRng {
        MetricRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable metric slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every metric's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum MetricSlot {
    ServiceLevel = 0,
    CallsTotal = 1,
    CallsHandled = 2,
    AvgHandleTime = 3,
    AvgWaitTime = 4,
    PoliciesSold = 5,
    QuotesIssued = 6,
    // Add new metrics here, append only.
}

impl MetricSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ServiceLevel => "service_level",
            Self::CallsTotal => "calls_total",
            Self::CallsHandled => "calls_handled",
            Self::AvgHandleTime => "avg_handle_time",
            Self::AvgWaitTime => "avg_wait_time",
            Self::PoliciesSold => "policies_sold",
            Self::QuotesIssued => "quotes_issued",
        }
    }
}
