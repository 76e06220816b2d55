use serde::{Deserialize, Serialize};

/// Wrapper every backend response uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(alias = "success")]
    pub is_success: bool,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Envelope {
            is_success: true,
            code: "COMMON200".to_string(),
            message: "OK".to_string(),
            result: Some(result),
        }
    }
}

/// Legacy endpoints whose result shape is not pinned down yet.
pub type Untyped = serde_json::Value;
