use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Ecommerce,
    Saas,
    Portfolio,
    Blog,
    General,
}

impl SiteType {
    pub fn label(self) -> &'static str {
        match self {
            SiteType::Ecommerce => "ecommerce",
            SiteType::Saas => "saas",
            SiteType::Portfolio => "portfolio",
            SiteType::Blog => "blog",
            SiteType::General => "general",
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Checked in order; the first group with a hit wins.
const TRIGGERS: &[(SiteType, &[&str])] = &[
    (SiteType::Ecommerce, &["ecommerce", "shop", "store"]),
    (SiteType::Saas, &["saas", "software", "dashboard"]),
    (SiteType::Portfolio, &["portfolio", "developer", "designer"]),
    (SiteType::Blog, &["blog", "articles"]),
];

pub fn classify(prompt: &str) -> SiteType {
    let p = prompt.to_lowercase();
    TRIGGERS
        .iter()
        .find(|(_, words)| words.iter().any(|w| p.contains(w)))
        .map(|(kind, _)| *kind)
        .unwrap_or(SiteType::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_archetype_triggers() {
        assert_eq!(classify("build me a shop landing page"), SiteType::Ecommerce);
        assert_eq!(classify("an analytics DASHBOARD"), SiteType::Saas);
        assert_eq!(classify("Portfolio for a photographer"), SiteType::Portfolio);
        assert_eq!(classify("my travel Blog"), SiteType::Blog);
        assert_eq!(classify("recent articles page"), SiteType::Blog);
    }

    #[test]
    fn no_trigger_falls_back_to_general() {
        assert_eq!(classify("a page about my cat"), SiteType::General);
        assert_eq!(classify(""), SiteType::General);
    }

    #[test]
    fn earlier_group_wins_on_overlap() {
        assert_eq!(classify("a blog for my online store"), SiteType::Ecommerce);
        assert_eq!(classify("portfolio of a software developer"), SiteType::Saas);
    }

    #[test]
    fn labels_are_lowercase() {
        assert_eq!(SiteType::Saas.to_string(), "saas");
        assert_eq!(serde_json::to_value(SiteType::Ecommerce).unwrap(), "ecommerce");
    }
}
