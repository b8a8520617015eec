use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::classify::classify;
use crate::errors::LayoutError;
use crate::extract;
use crate::history::HistoryStore;
use crate::prompt;
use crate::provider::ProviderRegistry;
use crate::wire::{GenerationResult, Layout, Mode};

/// Prompt in, envelope out. Owns nothing per session; the existing layout
/// always arrives with the request.
pub struct Pipeline {
    registry: ProviderRegistry,
    history: Arc<HistoryStore>,
}

impl Pipeline {
    pub fn new(registry: ProviderRegistry, history: Arc<HistoryStore>) -> Self {
        Self { registry, history }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn backend_timeout(&self) -> Duration {
        self.registry.timeout()
    }

    /// Never fails: anything that goes wrong becomes a degraded envelope
    /// whose payload is a single text component.
    pub async fn generate(
        &self,
        prompt: &str,
        existing: Option<&[Value]>,
        backend: Option<&str>,
    ) -> GenerationResult {
        let mode = Mode::for_existing(existing);
        match self.run(prompt, existing, backend).await {
            Ok(layout) => GenerationResult::generated(mode, layout),
            Err(e) => {
                error!("generation failed: {e}");
                GenerationResult::failed(mode, e.to_string())
            }
        }
    }

    async fn run(
        &self,
        prompt: &str,
        existing: Option<&[Value]>,
        backend: Option<&str>,
    ) -> Result<Layout, LayoutError> {
        let site = classify(prompt);
        let kind = self.registry.resolve(backend);
        let ins = prompt::compose(site, prompt, existing);
        info!(site = %site, backend = %kind, mode = ?ins.mode(), "processing prompt");

        let raw = match self.registry.invoke(kind, &ins).await {
            Ok(raw) => raw,
            Err(e) => {
                self.history.record(format!("[error] {e}"));
                return Err(e);
            }
        };
        debug!("raw response:\n{raw}");

        // Record before parsing; malformed output must still land in history.
        self.history.record(raw.as_str());
        let layout = extract::extract_layout(&raw)?;
        for note in extract::schema_drift(&raw, &layout) {
            warn!("schema drift: {note}");
        }
        Ok(layout)
    }
}
