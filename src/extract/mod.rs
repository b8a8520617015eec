use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::errors::LayoutError;
use crate::wire::Layout;

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json)?").expect("static regex"))
}

/// Remove every code-fence marker, wherever it appears, then trim.
pub fn strip_fences(raw: &str) -> String {
    fence_re().replace_all(raw, "").trim().to_string()
}

/// Parse cleaned text into a layout. A lone object becomes a one-element
/// layout; scalars are rejected.
pub fn parse_layout(cleaned: &str) -> Result<Layout, LayoutError> {
    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| LayoutError::Extract(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items),
        obj @ Value::Object(_) => Ok(vec![obj]),
        other => Err(LayoutError::Extract(format!(
            "expected a component object or array, got {}",
            kind_of(&other)
        ))),
    }
}

/// Raw backend text to layout.
pub fn extract_layout(raw: &str) -> Result<Layout, LayoutError> {
    parse_layout(&strip_fences(raw))
}

/// Notes about output that drifts from the component shape. These are only
/// ever reported, never enforced.
pub fn schema_drift(raw: &str, layout: &[Value]) -> Vec<String> {
    let mut notes = Vec::new();
    if raw.contains("componentName") || raw.contains("properties") {
        notes.push("response uses non-standard keys like 'componentName' or 'properties'".into());
    }
    walk(layout, "", &mut notes);
    notes
}

fn walk(items: &[Value], prefix: &str, notes: &mut Vec<String>) {
    for (i, item) in items.iter().enumerate() {
        let at = format!("{prefix}[{i}]");
        let Some(obj) = item.as_object() else {
            notes.push(format!("{at} is not an object"));
            continue;
        };
        if !obj.get("type").is_some_and(Value::is_string) {
            notes.push(format!("{at} has no string 'type'"));
        }
        if let Some(style) = obj.get("style") {
            if !style.is_object() {
                notes.push(format!("{at}.style is {} instead of an object", kind_of(style)));
            }
        }
        if let Some(Value::Array(children)) = obj.get("children") {
            walk(children, &format!("{at}.children"), notes);
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
