use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cli::BackendKind;
use crate::config::{key_var, Config};
use crate::errors::LayoutError;
use crate::wire::Instruction;

pub mod demo;
pub mod gemini;
pub mod openai;

/// A text-generation backend: instruction in, raw text out. Implementations
/// are stateless per call and never retry.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self, ins: &Instruction) -> Result<String>;
}

pub type DynProvider = Arc<dyn Provider>;

pub struct ProviderRegistry {
    providers: HashMap<BackendKind, DynProvider>,
    default: BackendKind,
    timeout: Duration,
}

impl ProviderRegistry {
    pub fn new(default: BackendKind, default_provider: DynProvider, timeout: Duration) -> Self {
        let mut providers = HashMap::new();
        providers.insert(default, default_provider);
        Self { providers, default, timeout }
    }

    pub fn with(mut self, kind: BackendKind, provider: DynProvider) -> Self {
        self.providers.insert(kind, provider);
        self
    }

    /// Build every backend the configuration has credentials for. Only a
    /// missing default is fatal.
    pub fn from_config(cfg: &Config) -> Result<Self, LayoutError> {
        cfg.validate()?;
        let mut providers: HashMap<BackendKind, DynProvider> = HashMap::new();
        providers.insert(BackendKind::Demo, Arc::new(demo::Demo));

        match cfg.api_key(BackendKind::Gemini) {
            Some(key) => {
                providers.insert(
                    BackendKind::Gemini,
                    Arc::new(gemini::Gemini::new(&cfg.gemini_model, key, &cfg.gemini_url)),
                );
            }
            None => warn!("{} not set; gemini backend disabled", key_var(BackendKind::Gemini)),
        }
        match cfg.api_key(BackendKind::OpenAI) {
            Some(key) => {
                providers.insert(
                    BackendKind::OpenAI,
                    Arc::new(openai::OpenAIProvider::new(&cfg.openai_model, key, &cfg.openai_url)),
                );
            }
            None => warn!("{} not set; openai backend disabled", key_var(BackendKind::OpenAI)),
        }

        Ok(Self { providers, default: cfg.backend, timeout: cfg.timeout() })
    }

    pub fn default_kind(&self) -> BackendKind {
        self.default
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn available(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<_> = self.providers.keys().copied().collect();
        kinds.sort_by_key(|k| k.tag());
        kinds
    }

    /// Unknown or unregistered tags resolve to the default backend.
    pub fn resolve(&self, requested: Option<&str>) -> BackendKind {
        match requested.and_then(BackendKind::from_tag) {
            Some(kind) if self.providers.contains_key(&kind) => kind,
            Some(kind) => {
                debug!("backend {kind} not registered, using {}", self.default);
                self.default
            }
            None => self.default,
        }
    }

    /// Run the backend under the configured time budget. Expiry is reported
    /// the same way as any other backend failure.
    pub async fn invoke(&self, kind: BackendKind, ins: &Instruction) -> Result<String, LayoutError> {
        let provider = self
            .providers
            .get(&kind)
            .or_else(|| self.providers.get(&self.default))
            .ok_or_else(|| LayoutError::Backend(format!("no provider registered for {kind}")))?;

        debug!(backend = provider.name(), mode = ?ins.mode(), "invoking backend");
        match tokio::time::timeout(self.timeout, provider.generate(ins)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(LayoutError::Backend(format!("{e:#}"))),
            Err(_) => Err(LayoutError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow;

    #[async_trait]
    impl Provider for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn generate(&self, _ins: &Instruction) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("[]".into())
        }
    }

    struct Failing;

    #[async_trait]
    impl Provider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _ins: &Instruction) -> Result<String> {
            Err(anyhow::anyhow!("401 unauthorized"))
        }
    }

    fn ins() -> Instruction {
        Instruction { system: "s".into(), prompt: "p".into(), existing: None }
    }

    #[test]
    fn unknown_tags_resolve_to_default() {
        let reg = ProviderRegistry::new(BackendKind::Demo, Arc::new(demo::Demo), Duration::from_secs(1));
        assert_eq!(reg.resolve(None), BackendKind::Demo);
        assert_eq!(reg.resolve(Some("mystery")), BackendKind::Demo);
        // Known tag but not registered.
        assert_eq!(reg.resolve(Some("openai")), BackendKind::Demo);
        assert_eq!(reg.resolve(Some("demo")), BackendKind::Demo);
    }

    #[test]
    fn registered_tags_resolve_to_themselves() {
        let reg = ProviderRegistry::new(BackendKind::Demo, Arc::new(demo::Demo), Duration::from_secs(1))
            .with(BackendKind::OpenAI, Arc::new(Failing));
        assert_eq!(reg.resolve(Some("openai")), BackendKind::OpenAI);
        assert_eq!(reg.available(), vec![BackendKind::Demo, BackendKind::OpenAI]);
    }

    #[tokio::test]
    async fn timeout_is_a_backend_failure() {
        let reg = ProviderRegistry::new(BackendKind::Gemini, Arc::new(Slow), Duration::from_millis(20));
        let err = reg.invoke(BackendKind::Gemini, &ins()).await.unwrap_err();
        assert!(matches!(err, LayoutError::Timeout(_)));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let reg = ProviderRegistry::new(BackendKind::Gemini, Arc::new(Failing), Duration::from_secs(1));
        let err = reg.invoke(BackendKind::Gemini, &ins()).await.unwrap_err();
        assert!(err.to_string().contains("401 unauthorized"));
    }

    #[test]
    fn from_config_registers_what_has_keys() {
        let cfg = Config {
            backend: BackendKind::OpenAI,
            openai_api_key: Some("sk-test".into()),
            ..Config::default()
        };
        let reg = ProviderRegistry::from_config(&cfg).unwrap();
        assert_eq!(reg.default_kind(), BackendKind::OpenAI);
        assert_eq!(reg.available(), vec![BackendKind::Demo, BackendKind::OpenAI]);
        assert_eq!(reg.resolve(Some("gemini")), BackendKind::OpenAI);
    }

    #[test]
    fn from_config_fails_without_default_key() {
        let cfg = Config { backend: BackendKind::Gemini, ..Config::default() };
        assert!(matches!(ProviderRegistry::from_config(&cfg), Err(LayoutError::Config(_))));
    }
}
