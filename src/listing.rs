use rust_decimal::Decimal;
use serde::Serialize;

use crate::extract::{AttributeExtractor, extract_price};

/// Site-injected placeholder that is not a real listing.
const PLACEHOLDER_TITLE: &str = "shop on ebay";

/// One sold listing with the attributes inferred from its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub name: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Raw title/price text pulled out of one item container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub title: Option<String>,
    pub price_text: Option<String>,
}

impl Candidate {
    pub fn new(title: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            price_text: Some(price_text.into()),
        }
    }
}

/// Keeps candidates with a title and a parseable price, drops the
/// placeholder entry, and attributes the rest. Order is preserved.
pub fn into_records(candidates: Vec<Candidate>, extractor: &AttributeExtractor) -> Vec<ListingRecord> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let title = candidate.title?.trim().to_string();
            if title.is_empty() || title.eq_ignore_ascii_case(PLACEHOLDER_TITLE) {
                return None;
            }
            let price = extract_price(candidate.price_text.as_deref()?)?;
            let attrs = extractor.extract(&title);

            Some(ListingRecord {
                name: title,
                price,
                storage: attrs.storage,
                color: attrs.color,
                condition: attrs.condition,
            })
        })
        .collect()
}
