//! Simulated call-center KPI core: seeded daily dataset generation,
//! date-range filtering, aggregation, CSV export, agent ranking
//! and a login-gated request handler.

pub mod agents;
pub mod aggregate;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod filter;
pub mod generator;
pub mod record;
pub mod requests;
pub mod rng;
pub mod types;

pub use error::{KpiError, KpiResult};
