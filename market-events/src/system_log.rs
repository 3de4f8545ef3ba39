//! Structured system log records carried over the bus.

use crate::error::{require_non_empty, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity of a system log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// A log line emitted by a platform component, with optional structured
/// extra data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemLogEvent {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    component: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra: Option<Map<String, Value>>,
}

impl SystemLogEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
        extra: Option<Map<String, Value>>,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            timestamp,
            level,
            component: component.into(),
            message: message.into(),
            extra,
        };
        event.validate()?;
        Ok(event)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("component", &self.component)?;
        require_non_empty("message", &self.message)?;
        Ok(())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extra(&self) -> Option<&Map<String, Value>> {
        self.extra.as_ref()
    }
}
