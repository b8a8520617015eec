use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Provider;
use crate::wire::Instruction;

/// Parts-style backend: the whole instruction goes out as one user turn made
/// of ordered text segments.
pub struct Gemini {
    model: String,
    api_key: String,
    api_base: String,
    client: Client,
}

impl Gemini {
    pub fn new(model: &str, api_key: &str, api_base: &str) -> Self {
        Self {
            model: model.to_string(),
            api_key: api_key.to_string(),
            api_base: api_base.to_string(),
            client: Client::new(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<PartIn>,
}

#[derive(Serialize)]
struct PartIn {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentOut>,
}

#[derive(Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, ins: &Instruction) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: ins.parts().into_iter().map(|text| PartIn { text }).collect(),
            }],
        };

        debug!("gemini: POST {url}");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("gemini read body failed")?;
        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({}): {}", status, text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("failed to parse Gemini response: {e}"))?;

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| anyhow!("gemini: response had no candidates"))?;

        let out: String = content.parts.into_iter().map(|p| p.text).collect();
        Ok(out.trim().to_string())
    }
}
