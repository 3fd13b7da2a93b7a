//! Agent ranking tests.

use kpi_core::{
    agents::{default_roster, ranking, AgentStats},
    KpiError,
};

#[test]
fn ranking_orders_by_policies_sold() {
    let ranked = ranking(&default_roster(), None).unwrap();
    let names: Vec<_> = ranked.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["María García", "Ana Martínez", "Juan Pérez", "Luis Rodríguez", "Carlos López"]
    );
}

#[test]
fn ties_break_by_name() {
    let roster = vec![
        AgentStats { name: "Zoe".into(), calls: 10, service_level: 90.0, avg_handle_time: 4.0, policies_sold: 3 },
        AgentStats { name: "Adam".into(), calls: 12, service_level: 91.0, avg_handle_time: 4.1, policies_sold: 3 },
    ];
    let ranked = ranking(&roster, None).unwrap();
    assert_eq!(ranked[0].name, "Adam");
}

#[test]
fn filter_returns_the_one_agent() {
    let ranked = ranking(&default_roster(), Some("Juan Pérez")).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].policies_sold, 28);
}

#[test]
fn unknown_agent_is_an_error() {
    assert!(matches!(
        ranking(&default_roster(), Some("Nobody")),
        Err(KpiError::UnknownAgent(name)) if name == "Nobody"
    ));
}
