use serde_json::Value;

use crate::classify::SiteType;
use crate::wire::Instruction;

fn guidance(site: SiteType) -> &'static str {
    match site {
        SiteType::Ecommerce => r#"Design a high-converting eCommerce site with:
- A visually appealing product showcase (grid or carousel)
- Filterable categories or tags
- Clear product cards with price, image, and "Add to Cart"
- A promotional banner or featured deal
- Prominent CTAs like "Shop Now", "Buy", or "Get Deal"
- Customer testimonials and trust badges"#,
        SiteType::Saas => r#"Design a sleek, conversion-focused SaaS website that includes:
- A feature-rich Hero with CTA (e.g., "Start Free Trial")
- A section explaining core product features
- Pricing plans in a 3-column layout with CTA buttons
- Testimonials from users or companies
- Integrations or platform logos
- Clean footer with legal links and socials"#,
        SiteType::Portfolio => r#"Design a visually strong portfolio site for a creative professional:
- Hero with name, title (e.g., "Full-Stack Developer"), and CTA
- Project gallery with images and project descriptions
- About section with skills and tech stack
- Testimonials or client quotes
- Contact form with modern styling"#,
        SiteType::Blog => r#"Design a minimal and readable blog layout:
- Hero with blog title and description
- Latest post previews (title, date, image, excerpt)
- Sidebar with categories, tags, or newsletter signup
- Author bio or About section
- Clean footer with social links"#,
        SiteType::General => r#"Design a clean, modern multi-purpose site:
- A bold Hero with a strong message and CTA
- Features or services section
- Visual testimonials or trust section
- Pricing (if applicable)
- Contact form or newsletter signup
- Footer with essential links"#,
    }
}

fn component_format() -> &'static str {
r##"COMPONENT FORMAT:
Each object must follow:

{
  "type": "ComponentType",
  "title": "...",
  "subtitle": "...",
  "content": "...",
  "image": "...",
  "backgroundImage": "...",
  "cta": {
    "label": "...",
    "href": "...",
    "style": { "backgroundColor": "#...", "color": "#..." }
  },
  "style": {
    "backgroundColor": "#...",
    "color": "#...",
    "padding": "...",
    "margin": "...",
    "textAlign": "...",
    ...
  },
  "children": [ ... ]
}

Structured sub-lists: Pricing uses "plans", ContactForm uses "fields", Table uses "rows"."##
}

fn style_rules() -> &'static str {
r##"STYLE RULES:
- Always include a "style" object per component and per card; "style" is always an object, never a string
- Use padding (e.g. "2rem"), borderRadius (e.g. "8px"), textAlign
- Set "color" and "backgroundColor" based on contrast best practices
- Text color follows background luminance: dark backgrounds get light text (e.g. "#fff"), light backgrounds get dark text (e.g. "#111")
- Default to a light page with dark text when the prompt names no colors
- Use high-quality image URLs (e.g. `https://source.unsplash.com/...` or `https://picsum.photos/...`)

IMAGE RULES:
- Hero uses "backgroundImage"
- Cards or image blocks use "image"
- Logos must be in "logo": { "src": "...", "alt": "..." }

RESPONSIVE DESIGN:
- Use CSS units like rem, %, auto, maxWidth
- Apply grid or flex for layout with mobile fallbacks
- Ensure spacing, alignment, and font sizes scale on devices"##
}

fn edit_rules() -> &'static str {
r#"WHEN EDITING EXISTING COMPONENTS:
- Update only the relevant items passed
- Do not repeat unchanged parts
- Match by `type`, `id`, or `title` if available

SPECIAL RULE - FULL BACKGROUND:
If the user prompt says "make the site red" or "background yellow", wrap all components in:

{
  "type": "Section",
  "style": { "backgroundColor": "red" },
  "children": [ ... ]
}"#
}

fn output_rules() -> &'static str {
r#"DO NOT:
- Use markdown (no ```json)
- Add any comments or explanations
- Include invalid JSON

GOAL:
Output a clean, readable, and fully valid JSON array - nothing else."#
}

pub fn system_prompt(site: SiteType) -> String {
    format!(r#"You are a senior UI/UX designer and AI-powered frontend engineer.

TASK:
Translate the user's natural language website prompt into a valid JSON array representing UI layout components for a modern, responsive website.

{guidance}

FOCUS ON MODERN DESIGN:
- Prioritize beautiful layout flow, balanced whitespace, and visual hierarchy
- Design must feel premium, like Stripe, Linear, Notion, Vercel, Framer
- Include responsive layout and attractive styling for each component
- Mobile-friendly spacing, centered alignment, and good readability

SUPPORTED COMPONENT TYPES:
- Header (with logo, navigation, CTA)
- Hero (title, subtitle, backgroundImage, CTA)
- Section (title, layout, children)
- Card (inside Section or Testimonials)
- Text (styled block text)
- Image (with src and alt)
- Pricing (title, plans array)
- ContactForm (with fields, CTA)
- Table (title, rows array)
- Footer (content, socialLinks)

{component_format}

{style_rules}

{edit_rules}

{output_rules}"#,
    guidance = guidance(site),
    component_format = component_format(),
    style_rules = style_rules(),
    edit_rules = edit_rules(),
    output_rules = output_rules()
    )
}

/// Assemble the instruction for one request. Editing is selected only when
/// there is a non-empty layout to edit.
pub fn compose(site: SiteType, prompt: &str, existing: Option<&[Value]>) -> Instruction {
    let existing = existing
        .filter(|c| !c.is_empty())
        .map(|c| serde_json::to_string(c).unwrap_or_else(|_| "[]".to_string()));
    Instruction {
        system: system_prompt(site),
        prompt: prompt.to_string(),
        existing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::wire::Mode;
    use serde_json::json;

    #[test]
    fn shop_prompt_gets_ecommerce_guidance() {
        let prompt = "build me a shop landing page";
        let ins = compose(classify(prompt), prompt, None);
        assert!(ins.system.contains("high-converting eCommerce site"));
        assert!(!ins.system.contains("minimal and readable blog"));
        assert_eq!(ins.mode(), Mode::Create);
        assert_eq!(ins.prompt, prompt);
    }

    #[test]
    fn edit_carries_layout_and_background_rule() {
        let layout = vec![json!({ "type": "Hero", "title": "Hi" })];
        let prompt = "make the background red";
        let ins = compose(classify(prompt), prompt, Some(layout.as_slice()));
        assert_eq!(ins.mode(), Mode::Edit);
        let sent: Value = serde_json::from_str(ins.existing.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!(layout));
        assert!(ins.system.contains("FULL BACKGROUND"));
        assert!(ins.system.contains("wrap all components in"));
        assert!(ins.system.contains("Match by `type`, `id`, or `title`"));
    }

    #[test]
    fn empty_layout_composes_as_create() {
        let ins = compose(SiteType::General, "x", Some(&[][..]));
        assert!(ins.existing.is_none());
    }

    #[test]
    fn rulebook_contains_every_policy_block() {
        let sys = system_prompt(SiteType::Blog);
        for needle in [
            "SUPPORTED COMPONENT TYPES",
            "COMPONENT FORMAT",
            "STYLE RULES",
            "background luminance",
            "IMAGE RULES",
            "RESPONSIVE DESIGN",
            "no ```json",
            "fully valid JSON array",
        ] {
            assert!(sys.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn composition_is_deterministic() {
        let layout = vec![json!({ "type": "Footer" })];
        let a = compose(SiteType::Saas, "p", Some(layout.as_slice()));
        let b = compose(SiteType::Saas, "p", Some(layout.as_slice()));
        assert_eq!(a, b);
    }
}
