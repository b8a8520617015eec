use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai", alias = "gpt")]
    OpenAI,
    /// Canned offline layout, no credential needed.
    Demo,
}

impl BackendKind {
    /// Lenient lookup for tags coming off the wire. Unknown tags yield `None`
    /// so the caller can fall back to its default.
    pub fn from_tag(tag: &str) -> Option<Self> {
        BackendKind::from_str(tag.trim(), true).ok()
    }

    pub fn tag(self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::OpenAI => "openai",
            BackendKind::Demo => "demo",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "layoutsmith", version, about = "Prompt-to-layout WebSocket service backed by text-generation models")]
pub struct Args {
    /// Optional TOML file layered over the built-in defaults.
    #[arg(long, env = "LAYOUTSMITH_CONFIG")]
    pub config: Option<String>,

    #[arg(long, env = "LAYOUTSMITH_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "LAYOUTSMITH_PORT")]
    pub port: Option<u16>,

    /// Backend used when a request names none, or an unknown one.
    #[arg(long, value_enum, env = "LAYOUTSMITH_BACKEND")]
    pub backend: Option<BackendKind>,

    #[arg(long, env = "GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    #[arg(long, env = "OPENAI_MODEL")]
    pub openai_model: Option<String>,

    #[arg(long, env = "LAYOUTSMITH_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_parse_leniently() {
        assert_eq!(BackendKind::from_tag("gemini"), Some(BackendKind::Gemini));
        assert_eq!(BackendKind::from_tag("OpenAI"), Some(BackendKind::OpenAI));
        assert_eq!(BackendKind::from_tag(" gpt "), Some(BackendKind::OpenAI));
        assert_eq!(BackendKind::from_tag("demo"), Some(BackendKind::Demo));
        assert_eq!(BackendKind::from_tag("claude"), None);
        assert_eq!(BackendKind::from_tag(""), None);
    }

    #[test]
    fn args_parse_overrides() {
        let args = Args::parse_from([
            "layoutsmith",
            "--port",
            "9000",
            "--backend",
            "openai",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.backend, Some(BackendKind::OpenAI));
        assert_eq!(args.timeout_secs, Some(5));
        assert!(!args.debug);
    }
}
