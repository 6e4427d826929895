//! The role-gated session: every user action passes through here.
//!
//! A session enforces one ordering on every call to `perform()`:
//!
//!   Policy → Usage log → Action
//!
//! The action closure is never run unless the role permits it, and a
//! permitted action is always logged before it runs. A usage-log write
//! failure aborts the action.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use wardbook_contracts::{
    action::Action,
    error::{WardError, WardResult},
    usage::UsageRecord,
};

use crate::traits::{AccessPolicy, Authenticator, UsageLog};

/// Usage-log action name written when a session ends.
pub const EXIT_ACTION: &str = "exit";

/// An authenticated user and the components that gate their actions.
pub struct Session {
    username: String,
    role: String,
    login_time: NaiveDateTime,
    policy: Box<dyn AccessPolicy>,
    log: Box<dyn UsageLog>,
}

impl Session {
    /// Open a session for a user whose role is already known.
    pub fn new(
        username: impl Into<String>,
        role: impl Into<String>,
        policy: Box<dyn AccessPolicy>,
        log: Box<dyn UsageLog>,
    ) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            login_time: Local::now().naive_local(),
            policy,
            log,
        }
    }

    /// Authenticate and open a session.
    ///
    /// Returns `WardError::AuthenticationFailed` when the credentials do not
    /// match; the error says nothing about which field was wrong.
    pub fn login(
        auth: &dyn Authenticator,
        username: &str,
        password: &str,
        policy: Box<dyn AccessPolicy>,
        log: Box<dyn UsageLog>,
    ) -> WardResult<Self> {
        match auth.authenticate(username, password) {
            Some(role) => {
                info!(username = %username, role = %role, "login succeeded");
                Ok(Self::new(username, role, policy, log))
            }
            None => {
                warn!(username = %username, "login rejected");
                Err(WardError::AuthenticationFailed)
            }
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn login_time(&self) -> NaiveDateTime {
        self.login_time
    }

    /// Return true if this session's role may perform `action`.
    pub fn can_perform(&self, action: Action) -> bool {
        self.policy.permits(&self.role, action)
    }

    /// The actions this role may perform, in menu order.
    pub fn allowed_actions(&self) -> Vec<Action> {
        let caps = self.policy.permissions(&self.role);
        Action::ALL.into_iter().filter(|a| caps.permits(*a)).collect()
    }

    /// Run `f` as `action` on behalf of this session's user.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the role lacks the action; `f` is not called
    ///   and nothing is logged.
    /// - Any error from the usage log; `f` is not called.
    /// - Whatever `f` itself returns.
    pub fn perform<T>(&self, action: Action, f: impl FnOnce() -> WardResult<T>) -> WardResult<T> {
        if !self.can_perform(action) {
            warn!(
                username = %self.username,
                role = %self.role,
                action = %action,
                "action not permitted for role"
            );
            return Err(WardError::PermissionDenied {
                role: self.role.clone(),
                action: action.to_string(),
            });
        }

        self.record(action.as_str())?;
        debug!(username = %self.username, action = %action, "running action");
        f()
    }

    /// Log the end of the session.
    pub fn close(&self) -> WardResult<()> {
        self.record(EXIT_ACTION)?;
        info!(username = %self.username, "session closed");
        Ok(())
    }

    /// Close the session after a command and return the command's outcome.
    ///
    /// When both the command and the `exit` record fail, the command's error
    /// is returned and the close error is only logged.
    pub fn finish<T>(&self, outcome: WardResult<T>) -> WardResult<T> {
        match (outcome, self.close()) {
            (Err(e), Err(close_err)) => {
                warn!(username = %self.username, error = %close_err, "failed to record session exit");
                Err(e)
            }
            (outcome, closed) => closed.and(outcome),
        }
    }

    fn record(&self, action: &str) -> WardResult<()> {
        let record = UsageRecord {
            username: self.username.clone(),
            role: self.role.clone(),
            action: action.to_string(),
            login_time: self.login_time,
            action_time: Local::now().naive_local(),
        };
        self.log.append(&record)
    }
}
