use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::cli::{Args, BackendKind};
use crate::errors::LayoutError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: BackendKind,
    pub gemini_model: String,
    pub gemini_url: String,
    pub openai_model: String,
    pub openai_url: String,
    pub timeout_secs: u64,
    /// Credentials only ever come from the environment.
    #[serde(skip)]
    pub gemini_api_key: Option<String>,
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            backend: BackendKind::Gemini,
            gemini_model: "gemini-2.0-flash".into(),
            gemini_url: "https://generativelanguage.googleapis.com".into(),
            openai_model: "gpt-4".into(),
            openai_url: "https://api.openai.com".into(),
            timeout_secs: 60,
            gemini_api_key: None,
            openai_api_key: None,
        }
    }
}

impl Config {
    /// defaults < TOML file < CLI/env flags. Credentials are read from the
    /// process environment (after `.env` has been loaded by the caller).
    pub fn load(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_args(args);
        cfg.gemini_api_key = non_empty_env("GEMINI_API_KEY");
        cfg.openai_api_key = non_empty_env("OPENAI_API_KEY");
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {path}"))
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(h) = &args.host {
            self.host = h.clone();
        }
        if let Some(p) = args.port {
            self.port = p;
        }
        if let Some(b) = args.backend {
            self.backend = b;
        }
        if let Some(m) = &args.gemini_model {
            self.gemini_model = m.clone();
        }
        if let Some(m) = &args.openai_model {
            self.openai_model = m.clone();
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
    }

    pub fn api_key(&self, kind: BackendKind) -> Option<&str> {
        match kind {
            BackendKind::Gemini => self.gemini_api_key.as_deref(),
            BackendKind::OpenAI => self.openai_api_key.as_deref(),
            BackendKind::Demo => None,
        }
    }

    /// The default backend must be usable; anything else is optional.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.timeout_secs == 0 {
            return Err(LayoutError::Config("timeout_secs must be greater than zero".into()));
        }
        match self.backend {
            BackendKind::Demo => Ok(()),
            kind if self.api_key(kind).is_none() => Err(LayoutError::Config(format!(
                "{} is not set but {kind} is the default backend",
                key_var(kind)
            ))),
            _ => Ok(()),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn key_var(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::Gemini => "GEMINI_API_KEY",
        BackendKind::OpenAI => "OPENAI_API_KEY",
        BackendKind::Demo => "",
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
