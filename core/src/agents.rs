//! Per-agent ranking.

use crate::error::{KpiError, KpiResult};
use serde::{Deserialize, Serialize};

/// Period totals for one agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentStats {
    pub name:            String,
    pub calls:           u32,
    pub service_level:   f64,
    /// TMO, minutes.
    pub avg_handle_time: f64,
    pub policies_sold:   u32,
}

impl AgentStats {
    fn new(name: &str, calls: u32, service_level: f64, avg_handle_time: f64, policies_sold: u32) -> Self {
        Self { name: name.to_string(), calls, service_level, avg_handle_time, policies_sold }
    }
}

/// Roster used when the config does not list agents.
pub fn default_roster() -> Vec<AgentStats> {
    vec![
        AgentStats::new("Juan Pérez", 450, 95.2, 4.2, 28),
        AgentStats::new("María García", 520, 92.8, 5.1, 35),
        AgentStats::new("Carlos López", 380, 89.5, 3.8, 22),
        AgentStats::new("Ana Martínez", 490, 94.1, 4.5, 31),
        AgentStats::new("Luis Rodríguez", 410, 91.3, 4.8, 26),
    ]
}

/// Agents ordered by policies sold (desc), ties by name.
/// With `agent` set, only that agent is returned.
pub fn ranking(roster: &[AgentStats], agent: Option<&str>) -> KpiResult<Vec<AgentStats>> {
    let mut ranked: Vec<AgentStats> = match agent {
        Some(name) => {
            let found: Vec<_> = roster.iter().filter(|a| a.name == name).cloned().collect();
            if found.is_empty() {
                return Err(KpiError::UnknownAgent(name.to_string()));
            }
            found
        }
        None => roster.to_vec(),
    };
    ranked.sort_by(|a, b| b.policies_sold.cmp(&a.policies_sold).then_with(|| a.name.cmp(&b.name)));
    Ok(ranked)
}
