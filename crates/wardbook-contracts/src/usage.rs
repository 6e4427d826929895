//! Usage-log rows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used in the usage log and for session login times.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the usage log: who did what, and when.
///
/// `action` is a free string rather than an [`Action`](crate::action::Action)
/// because session bookkeeping entries such as `exit` are logged too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub username: String,
    pub role: String,
    pub action: String,
    pub login_time: NaiveDateTime,
    pub action_time: NaiveDateTime,
}
