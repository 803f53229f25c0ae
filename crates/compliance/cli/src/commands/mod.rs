//! CLI command implementations

pub mod check;
pub mod consent;
pub mod gate;
pub mod strength;
pub mod submit;

/// What a command prints and whether it counts as success.
#[derive(Debug)]
pub struct CommandOutput {
    pub body: Option<serde_json::Value>,
    pub success: bool,
}

impl CommandOutput {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            success: true,
        }
    }

    pub fn failed(body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            success: false,
        }
    }
}
