//! Known product names
//!
//! Optional filter applied to recognition results: a label is kept when its
//! product name contains a catalog name, ignoring case. This discards reads of
//! unrelated text (signage, packaging) that the recognizer mistook for labels.

use crate::models::ParsedLabel;
use tracing::debug;

/// Product list the kitchen starts with
pub const DEFAULT_PRODUCTS: &[&str] = &[
    "korean red pepper",
    "soy sauce",
    "sesame oil",
    "garlic paste",
    "ginger chicken",
    "itame chicken",
    "fresh fruit & veg - cut",
];

#[derive(Debug, Clone)]
pub struct ProductCatalog {
    /// Lower-cased product names
    names: Vec<String>,
}

impl ProductCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_PRODUCTS)
    }

    /// True when the label's product name contains a known product
    pub fn matches(&self, label: &ParsedLabel) -> bool {
        let product = label.product_name.to_lowercase();
        self.names.iter().any(|name| product.contains(name.as_str()))
    }

    /// Keep only labels for known products
    pub fn filter(&self, labels: Vec<ParsedLabel>) -> Vec<ParsedLabel> {
        let received = labels.len();
        let kept: Vec<ParsedLabel> = labels.into_iter().filter(|l| self.matches(l)).collect();
        debug!(received, kept = kept.len(), "Filtered labels by product catalog");
        kept
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
