//! Request lifecycle: busy-state toggling and uniform error surfacing.
//!
//! Every orchestrator wraps its requests in the same two steps:
//!
//! 1. [`begin`] enters busy (loading indicator on, triggering control
//!    disabled) and releases the request effect. A control that is already
//!    disabled refuses a second request; this is the only admission rule.
//! 2. [`settle`] exits busy unconditionally, then either hands the payload
//!    to the caller or raises an alert for a transport failure or a payload
//!    carrying an `error` field.
//!
//! `cmd` guarantees that every released effect settles exactly once, so a
//! control is only left disabled by a request that never resolves.

use std::collections::VecDeque;

use colorevolve_types::Effect;
use serde_json::Value;
use tracing::{debug, warn};

/// Loading indicator plus the disabled state of its triggering control.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BusyIndicator {
    loading: bool,
    control_disabled: bool,
}

impl BusyIndicator {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_control_disabled(&self) -> bool {
        self.control_disabled
    }

    fn enter(&mut self) {
        self.loading = true;
        self.control_disabled = true;
    }

    fn exit(&mut self) {
        self.loading = false;
        self.control_disabled = false;
    }
}

/// Blocking, user-visible messages. The front-most one is shown until
/// dismissed.
#[derive(Debug, Default)]
pub struct Alerts {
    queue: VecDeque<String>,
}

impl Alerts {
    pub fn raise(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(alert = %message, "alert raised");
        self.queue.push_back(message);
    }

    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Enter busy and release `effect`, unless the control is already disabled.
pub fn begin(indicator: &mut BusyIndicator, effect: Effect) -> Option<Effect> {
    if indicator.control_disabled {
        debug!(control = ?effect.control(), "request refused; control is disabled");
        return None;
    }
    indicator.enter();
    Some(effect)
}

/// Exit busy and deliver the payload, or surface the failure.
pub fn settle(indicator: &mut BusyIndicator, result: Result<Value, String>, alerts: &mut Alerts) -> Option<Value> {
    indicator.exit();
    match result {
        Err(message) => {
            alerts.raise(format!("Error: {message}"));
            None
        }
        Ok(payload) => match application_error(&payload) {
            Some(message) => {
                alerts.raise(format!("Error: {message}"));
                None
            }
            None => Some(payload),
        },
    }
}

/// The message of an `error` field, when the field is present and truthy.
fn application_error(payload: &Value) -> Option<String> {
    match payload.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
