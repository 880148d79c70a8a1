//! Hot update message protocol.
//!
//! One JSON object per line on stdout in watch mode:
//!
//! - `update`: targeted re-evaluation of the listed modules
//! - `full-reload`: the host should reload everything

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Message sent to the host's hot-update channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HmrMessage {
    /// Re-evaluate exactly these modules.
    Update { updates: Vec<UpdateDescriptor> },

    /// Reload everything.
    FullReload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

/// Per-module update entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptor {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub path: String,
    pub accepted_path: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateKind {
    JsUpdate,
}

impl UpdateDescriptor {
    pub fn js(module: impl Into<String>, timestamp: u64) -> Self {
        let path = module.into();
        Self {
            kind: UpdateKind::JsUpdate,
            accepted_path: path.clone(),
            path,
            timestamp,
        }
    }
}

impl HmrMessage {
    /// Targeted update for `modules`, all stamped with the same time.
    pub fn update<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let timestamp = now_millis();
        Self::Update {
            updates: modules
                .into_iter()
                .map(|m| UpdateDescriptor::js(m, timestamp))
                .collect(),
        }
    }

    pub fn full_reload(reason: impl Into<String>) -> Self {
        Self::FullReload {
            reason: Some(reason.into()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"full-reload"}"#.to_string())
    }

}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
