//! Login-gated request handling tests.

use kpi_core::{
    auth::{PasswordDirectory, Role},
    config::DashboardConfig,
    context::DashboardContext,
    requests::RequestHandler,
};
use serde_json::Value;

fn context() -> DashboardContext {
    let _ = env_logger::builder().is_test(true).try_init();
    DashboardContext::new(DashboardConfig::default(), 42).expect("default config is valid")
}

fn directory() -> PasswordDirectory {
    let mut dir = PasswordDirectory::new();
    dir.add_user("director", "correct horse", Role::Director).unwrap();
    dir.add_user("supervisor", "battery staple", Role::Supervisor).unwrap();
    dir
}

fn send(handler: &mut RequestHandler<'_>, line: &str) -> Value {
    handler.handle_line(line).expect("request should produce a reply")
}

const LOGIN_DIRECTOR: &str = r#"{"type":"login","username":"director","password":"correct horse"}"#;
const SUMMARY_MARCH: &str = r#"{"type":"summary","start":"2024-03-01","end":"2024-03-31"}"#;
const EXPORT_MARCH: &str = r#"{"type":"export","start":"2024-03-01","end":"2024-03-31"}"#;

fn is_not_logged_in(reply: &Value) -> bool {
    reply["error"] == "Not logged in"
}

#[test]
fn data_requests_are_refused_before_login() {
    let ctx = context();
    let dir = directory();
    let mut handler = RequestHandler::new(&ctx, &dir);

    for line in [
        SUMMARY_MARCH,
        EXPORT_MARCH,
        r#"{"type":"rollup","start":"2024-01-01","end":"2024-12-31"}"#,
        r#"{"type":"agents"}"#,
    ] {
        let reply = send(&mut handler, line);
        assert!(is_not_logged_in(&reply), "{line} answered without a session: {reply}");
    }
}

#[test]
fn data_requests_are_served_after_login() {
    let ctx = context();
    let dir = directory();
    let mut handler = RequestHandler::new(&ctx, &dir);

    let login = send(&mut handler, LOGIN_DIRECTOR);
    assert_eq!(login["username"], "director");
    assert_eq!(login["role"], "director");
    assert_eq!(login["can_filter_by_agent"], true);
    assert!(handler.session().is_some());

    let summary = send(&mut handler, SUMMARY_MARCH);
    assert_eq!(summary["days"], 31, "unexpected summary: {summary}");

    let export = send(&mut handler, EXPORT_MARCH);
    assert_eq!(export["rows"], 31);
    assert_eq!(export["file_name"], "kpi_data_2024-03-01_2024-03-31.csv");
}

#[test]
fn logout_closes_the_gate_again() {
    let ctx = context();
    let dir = directory();
    let mut handler = RequestHandler::new(&ctx, &dir);

    send(&mut handler, LOGIN_DIRECTOR);
    assert_eq!(send(&mut handler, r#"{"type":"logout"}"#)["logged_out"], true);
    assert!(handler.session().is_none());
    assert!(is_not_logged_in(&send(&mut handler, EXPORT_MARCH)));
}

#[test]
fn rejected_login_leaves_no_session() {
    let ctx = context();
    let dir = directory();
    let mut handler = RequestHandler::new(&ctx, &dir);

    send(&mut handler, LOGIN_DIRECTOR);
    let reply = send(&mut handler, r#"{"type":"login","username":"director","password":"wrong"}"#);
    assert_eq!(reply["error"], "Invalid credentials");
    assert!(handler.session().is_none());
    assert!(is_not_logged_in(&send(&mut handler, SUMMARY_MARCH)));
}

#[test]
fn empty_period_has_one_no_data_shape() {
    let ctx = context();
    let dir = directory();
    let mut handler = RequestHandler::new(&ctx, &dir);
    send(&mut handler, LOGIN_DIRECTOR);

    let summary = send(&mut handler, r#"{"type":"summary","start":"2025-01-01","end":"2025-01-31"}"#);
    let rollup = send(
        &mut handler,
        r#"{"type":"rollup","start":"2025-01-01","end":"2025-01-31","granularity":"week"}"#,
    );
    let export = send(&mut handler, r#"{"type":"export","start":"2025-01-01","end":"2025-01-31"}"#);

    assert_eq!(summary["status"], "no_data");
    assert_eq!(summary, rollup);
    assert_eq!(summary, export);
}

#[test]
fn agent_filter_follows_the_role() {
    let ctx = context();
    let dir = directory();

    let mut director = RequestHandler::new(&ctx, &dir);
    send(&mut director, LOGIN_DIRECTOR);
    let one = send(&mut director, r#"{"type":"agents","agent":"Carlos López"}"#);
    assert_eq!(one.as_array().map(Vec::len), Some(1), "unexpected reply: {one}");
    assert_eq!(one[0]["name"], "Carlos López");

    let mut supervisor = RequestHandler::new(&ctx, &dir);
    let login = send(&mut supervisor, r#"{"type":"login","username":"supervisor","password":"battery staple"}"#);
    assert_eq!(login["can_filter_by_agent"], false);

    let all = send(&mut supervisor, r#"{"type":"agents"}"#);
    assert_eq!(all.as_array().map(Vec::len), Some(5));

    let filtered = send(&mut supervisor, r#"{"type":"agents","agent":"Carlos López"}"#);
    assert_eq!(filtered["error"], "Role 'supervisor' may not filter by agent");
}

#[test]
fn malformed_line_is_reported_and_quit_ends() {
    let ctx = context();
    let dir = directory();
    let mut handler = RequestHandler::new(&ctx, &dir);

    assert!(send(&mut handler, "not json").get("error").is_some());
    assert!(send(&mut handler, r#"{"type":"teleport"}"#).get("error").is_some());
    assert!(handler.handle_line(r#"{"type":"quit"}"#).is_none());
}
