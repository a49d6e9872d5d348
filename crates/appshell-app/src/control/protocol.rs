//! Request and response bodies of the control plane.

use appshell_common::{Placement, WindowId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST open`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenRequest {
    pub url: String,
    #[serde(default)]
    pub location: Placement,
    #[serde(default)]
    pub resident: bool,
}

/// Body of `POST openwithdata`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWithDataRequest {
    pub url: String,
    #[serde(default)]
    pub location: Placement,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub data_id: Option<String>,
}

/// Uniform JSON reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<WindowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_id: Option<String>,
    /// Present (possibly `null`) only on `getdatabyid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            success: true,
            id: None,
            data_id: None,
            data: None,
            error: None,
        }
    }

    pub fn opened(id: WindowId) -> Self {
        Self {
            id: Some(id),
            ..Self::ok()
        }
    }

    pub fn data(value: Value) -> Self {
        Self {
            data: Some(value),
            ..Self::ok()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::ok()
        }
    }
}

/// Messages a page sends over the `broadcast` socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum BroadcastRequest {
    Register {
        app_id: String,
    },
    Broadcast {
        app_id: String,
        #[serde(default)]
        data: Value,
    },
}
