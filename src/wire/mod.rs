use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ========================================
/// Session wire protocol
/// ========================================

/// An ordered list of components, rendered top to bottom. Components are kept
/// as raw JSON so unknown fields survive a round trip untouched.
pub type Layout = Vec<Value>;

pub const UPDATE_ACTION: &str = "update_component";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Create,
    Edit,
}

impl Mode {
    /// Editing only makes sense when there is something to edit.
    pub fn for_existing(existing: Option<&[Value]>) -> Self {
        match existing {
            Some(c) if !c.is_empty() => Mode::Edit,
            _ => Mode::Create,
        }
    }
}

/// A fully composed generation instruction, independent of backend shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub system: String,
    pub prompt: String,
    /// Compact JSON of the layout being edited; `None` when creating.
    pub existing: Option<String>,
}

impl Instruction {
    pub fn mode(&self) -> Mode {
        if self.existing.is_some() { Mode::Edit } else { Mode::Create }
    }

    /// Flat ordered text segments for parts-style backends.
    pub fn parts(&self) -> Vec<String> {
        let mut parts = vec![self.system.clone(), "User prompt:".to_string(), self.prompt.clone()];
        match &self.existing {
            Some(json) => {
                parts.push("Existing page layout as JSON:".into());
                parts.push(json.clone());
                parts.push(
                    "Update this layout according to the prompt. Modify only the relevant \
                     components and avoid duplicating unchanged ones."
                        .into(),
                );
            }
            None => parts.push("Generate a brand new layout from scratch.".into()),
        }
        parts
    }

    /// Single user turn for chat-style backends; the system text travels separately.
    pub fn user_message(&self) -> String {
        match &self.existing {
            Some(json) => format!(
                "Update this layout based on the following prompt:\n\n{}\n\nExisting layout:\n{}",
                self.prompt, json
            ),
            None => self.prompt.clone(),
        }
    }
}

/// Inbound frame sent by a client session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientMessage {
    /// Optional discriminator; `prompt` and `edit` are accepted.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub components: Option<Layout>,
    /// Backend tag, e.g. `gemini` or `openai`.
    #[serde(default)]
    pub model: Option<String>,
}

impl ClientMessage {
    pub fn is_supported(&self) -> bool {
        matches!(self.kind.as_deref(), None | Some("prompt") | Some("edit"))
    }

    pub fn prompt(&self) -> &str {
        self.content.as_deref().map(str::trim).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub action: String,
    pub mode: Mode,
    pub message: String,
    pub payload: Layout,
}

impl GenerationResult {
    pub fn generated(mode: Mode, payload: Layout) -> Self {
        Self {
            action: UPDATE_ACTION.into(),
            mode,
            message: format!("Generated {} component(s)", payload.len()),
            payload,
        }
    }

    /// Degraded envelope: a single text component carrying the failure.
    pub fn failed(mode: Mode, error: impl Into<String>) -> Self {
        Self {
            action: UPDATE_ACTION.into(),
            mode,
            message: "Failed to generate component(s)".into(),
            payload: vec![serde_json::json!({ "type": "text", "content": error.into() })],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeReply {
    pub notice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryReply {
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReply {
    pub status: String,
    pub sessions: usize,
    pub responses: usize,
}
