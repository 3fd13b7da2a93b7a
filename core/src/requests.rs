//! Request/response handling for an interactive dashboard client.
//!
//! RULE: every data request requires a session opened by a successful
//! login. A rejected login or a logout leaves no session behind.
//!
//! Replies are JSON values. An empty selection always answers with the
//! same "no data" shape, whatever the request.

use crate::{
    aggregate::Granularity,
    auth::{AuthError, Authenticator, Credentials, Session},
    context::DashboardContext,
    error::{KpiError, KpiResult},
    export,
    types::Day,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Every request a client may send, one JSON object per line.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Login(Credentials),
    Logout,
    Summary {
        start: Day,
        end:   Day,
    },
    Rollup {
        start: Day,
        end:   Day,
        #[serde(default)]
        granularity: Granularity,
    },
    Export {
        start: Day,
        end:   Day,
    },
    Agents {
        #[serde(default)]
        agent: Option<String>,
    },
    Quit,
}

pub struct RequestHandler<'a> {
    ctx:     &'a DashboardContext,
    auth:    &'a dyn Authenticator,
    session: Option<Session>,
}

impl<'a> RequestHandler<'a> {
    pub fn new(ctx: &'a DashboardContext, auth: &'a dyn Authenticator) -> Self {
        Self { ctx, auth, session: None }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Parse and handle one line. Returns None once the client quits.
    pub fn handle_line(&mut self, line: &str) -> Option<Value> {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                log::warn!("Unreadable request: {e}");
                Some(json!({ "error": e.to_string() }))
            }
        }
    }

    /// Handle one request. Returns None for Quit.
    pub fn handle(&mut self, request: Request) -> Option<Value> {
        if matches!(request, Request::Quit) {
            return None;
        }
        let reply = match self.dispatch(request) {
            Ok(value) => value,
            Err(KpiError::EmptyRange) => no_data(),
            Err(e) => json!({ "error": e.to_string() }),
        };
        Some(reply)
    }

    fn dispatch(&mut self, request: Request) -> KpiResult<Value> {
        match request {
            Request::Login(credentials) => self.login(&credentials),
            Request::Logout => {
                if let Some(s) = self.session.take() {
                    log::info!("Logout: user={}", s.username);
                }
                Ok(json!({ "logged_out": true }))
            }
            Request::Quit => Ok(Value::Null),
            data_request => {
                let session = self.session.as_ref().ok_or(AuthError::NotLoggedIn)?;
                self.data(session, data_request)
            }
        }
    }

    fn login(&mut self, credentials: &Credentials) -> KpiResult<Value> {
        // A failed attempt also ends any previous session.
        self.session = None;
        let session = self.auth.verify(credentials).inspect_err(|e| {
            log::warn!("Login rejected for user={}: {e}", credentials.username);
        })?;
        let reply = json!({
            "session": session.id,
            "username": session.username,
            "role": session.role,
            "can_filter_by_agent": session.role.can_filter_by_agent(),
        });
        self.session = Some(session);
        Ok(reply)
    }

    fn data(&self, session: &Session, request: Request) -> KpiResult<Value> {
        let ctx = self.ctx;
        match request {
            Request::Summary { start, end } => Ok(serde_json::to_value(ctx.summary(start, end)?)?),
            Request::Rollup { start, end, granularity } => {
                let periods = ctx.rollup(start, end, granularity)?;
                if periods.is_empty() {
                    return Err(KpiError::EmptyRange);
                }
                Ok(serde_json::to_value(periods)?)
            }
            Request::Export { start, end } => {
                let mut buf = Vec::new();
                let rows = ctx.export_csv(start, end, &mut buf)?;
                if rows == 0 {
                    return Err(KpiError::EmptyRange);
                }
                let csv = String::from_utf8(buf).map_err(|e| KpiError::Other(e.into()))?;
                Ok(json!({
                    "file_name": export::file_name(start, end),
                    "rows": rows,
                    "csv": csv,
                }))
            }
            Request::Agents { agent } => {
                if agent.is_some() && !session.role.can_filter_by_agent() {
                    return Err(AuthError::Forbidden { role: session.role }.into());
                }
                Ok(serde_json::to_value(ctx.agent_ranking(agent.as_deref())?)?)
            }
            Request::Login(_) | Request::Logout | Request::Quit => Ok(Value::Null),
        }
    }
}

fn no_data() -> Value {
    json!({
        "status": "no_data",
        "message": KpiError::EmptyRange.to_string(),
    })
}
