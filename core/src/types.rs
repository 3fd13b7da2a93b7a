//! Shared primitive types used across the KPI core.

use chrono::NaiveDate;

/// A calendar day. One record per day.
pub type Day = NaiveDate;

/// Master seed for a generated dataset.
pub type Seed = u64;

/// Stable identifier of an authenticated session.
pub type SessionId = String;
