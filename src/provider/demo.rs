use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use super::Provider;
use crate::wire::Instruction;

/// Offline backend returning a fixed sample page. Handy for wiring up a
/// client without spending tokens.
pub struct Demo;

#[async_trait]
impl Provider for Demo {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn generate(&self, _ins: &Instruction) -> Result<String> {
        Ok(serde_json::to_string_pretty(&sample_layout())?)
    }
}

pub fn sample_layout() -> serde_json::Value {
    json!([
        {
            "type": "Header",
            "logo": { "src": "https://picsum.photos/100/50", "alt": "Logo" },
            "navigation": [
                { "label": "Home", "link": "#home" },
                { "label": "About", "link": "#about" },
                { "label": "Contact", "link": "#contact" }
            ],
            "cta": { "label": "Get Started", "href": "#start" },
            "style": {
                "backgroundColor": "#000",
                "color": "#fff",
                "padding": "1rem",
                "display": "flex",
                "justifyContent": "space-between",
                "alignItems": "center"
            }
        },
        {
            "type": "Hero",
            "title": "Welcome to AI Builder",
            "subtitle": "Build websites with the power of AI",
            "backgroundImage": "https://picsum.photos/1200/400",
            "cta": {
                "label": "Try Now",
                "href": "#try",
                "style": {
                    "backgroundColor": "#2196f3",
                    "color": "#fff",
                    "padding": "10px 20px",
                    "borderRadius": "4px"
                }
            },
            "style": { "textAlign": "center", "padding": "4rem 2rem", "color": "#fff" }
        },
        {
            "type": "Section",
            "title": "Features",
            "layout": "grid",
            "columns": 3,
            "style": { "padding": "2rem", "backgroundColor": "#f5f5f5" },
            "children": [
                {
                    "type": "Card",
                    "title": "Fast Generation",
                    "image": "https://picsum.photos/200/150",
                    "content": "Generate UI components instantly with a single prompt.",
                    "style": { "padding": "1rem", "borderRadius": "8px" }
                },
                {
                    "type": "Card",
                    "title": "Live Preview",
                    "image": "https://picsum.photos/200/151",
                    "content": "See what you build in real time as you edit.",
                    "style": { "padding": "1rem", "borderRadius": "8px" }
                },
                {
                    "type": "Card",
                    "title": "Export Code",
                    "image": "https://picsum.photos/200/152",
                    "content": "Export React or HTML code for production use.",
                    "style": { "padding": "1rem", "borderRadius": "8px" }
                }
            ]
        },
        {
            "type": "Footer",
            "content": "© 2025 AI Builder. All rights reserved.",
            "socialLinks": [
                { "icon": "fab fa-twitter", "link": "https://twitter.com" },
                { "icon": "fab fa-github", "link": "https://github.com" }
            ],
            "style": {
                "backgroundColor": "#111",
                "color": "#fff",
                "textAlign": "center",
                "padding": "1rem"
            }
        }
    ])
}
