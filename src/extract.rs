use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::filters::ConditionCode;
use crate::query::SearchVariant;

const COLORS: [&str; 8] = [
    "Rose Gold", "Black", "White", "Gold", "Silver", "Gray", "Blue", "Red",
];

const BASIC_CONDITIONS: [&str; 4] = ["New", "Pre-owned", "Refurbished", "Used"];

static STORAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\d+(?:\.\d+)?\s*(?:GB|TB)")
        .case_insensitive(true)
        .build()
        .expect("storage pattern")
});

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[$£€]?\s*(\d[\d,]*(?:\.\d+)?)").expect("price pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attributes {
    pub storage: Option<String>,
    pub color: Option<String>,
    pub condition: Option<String>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.storage.is_none() && self.color.is_none() && self.condition.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct AttributeExtractor {
    color: Vocabulary,
    condition: Vocabulary,
}

impl AttributeExtractor {
    pub fn new(variant: SearchVariant) -> Self {
        let conditions: Vec<&str> = match variant {
            SearchVariant::Basic => BASIC_CONDITIONS.to_vec(),
            SearchVariant::FilterAware => ConditionCode::ALL.iter().map(|c| c.label()).collect(),
        };

        Self {
            color: Vocabulary::new(&COLORS),
            condition: Vocabulary::new(&conditions),
        }
    }

    pub fn extract(&self, title: &str) -> Attributes {
        Attributes {
            storage: STORAGE_RE.find(title).map(|m| m.as_str().to_string()),
            color: self.color.first_in(title),
            condition: self.condition.first_in(title),
        }
    }
}

impl Default for AttributeExtractor {
    fn default() -> Self {
        Self::new(SearchVariant::default())
    }
}

// canonical spelling of the earliest whole-word match
#[derive(Debug, Clone)]
struct Vocabulary {
    words: Vec<String>,
    pattern: Regex,
}

impl Vocabulary {
    fn new(words: &[&str]) -> Self {
        // longest first so multi-word entries win at the same position
        let mut sorted: Vec<&str> = words.to_vec();
        sorted.sort_by_key(|w| std::cmp::Reverse(w.len()));

        let alternation = sorted
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .expect("vocabulary pattern");

        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            pattern,
        }
    }

    fn first_in(&self, text: &str) -> Option<String> {
        let found = self.pattern.find(text)?.as_str();
        self.words
            .iter()
            .find(|w| w.eq_ignore_ascii_case(found))
            .cloned()
    }
}

pub fn extract_price(text: &str) -> Option<Decimal> {
    let digits = PRICE_RE.captures(text)?.get(1)?.as_str().replace(',', "");
    Decimal::from_str(&digits).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn extracts_all_three_attributes() {
        let attrs = AttributeExtractor::default().extract("iPhone 13 Pro 256GB Gold Pre-owned");
        assert_eq!(
            attrs,
            Attributes {
                storage: Some("256GB".into()),
                color: Some("Gold".into()),
                condition: Some("Pre-owned".into()),
            }
        );
    }

    #[test]
    fn plain_title_has_no_attributes() {
        assert!(AttributeExtractor::default().extract("Plain Phone").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_and_canonicalized() {
        let attrs = AttributeExtractor::default().extract("galaxy s21 128 gb ROSE GOLD open box");
        assert_eq!(attrs.storage.as_deref(), Some("128 gb"));
        assert_eq!(attrs.color.as_deref(), Some("Rose Gold"));
        assert_eq!(attrs.condition.as_deref(), Some("Open Box"));
    }

    #[test]
    fn first_occurrence_wins() {
        let attrs = AttributeExtractor::default().extract("Pixel 7 Black 1TB 256GB White");
        assert_eq!(attrs.storage.as_deref(), Some("1TB"));
        assert_eq!(attrs.color.as_deref(), Some("Black"));
    }

    #[test]
    fn storage_glued_to_surrounding_text_still_matches() {
        let extractor = AttributeExtractor::default();
        assert_eq!(
            extractor.extract("iPhone 13 Pro Max256GB Gold").storage.as_deref(),
            Some("256GB")
        );
        assert_eq!(
            extractor.extract("Laptop 16GBRAM 512GB SSD").storage.as_deref(),
            Some("16GB")
        );
        assert_eq!(
            extractor.extract("Galaxy S21 5G128GB").storage.as_deref(),
            Some("128GB")
        );
    }

    #[test]
    fn words_inside_other_words_do_not_match() {
        let attrs = AttributeExtractor::default().extract("Redmi Note Newest Goldfish");
        assert!(attrs.is_empty());
    }

    #[test]
    fn basic_vocabulary_knows_used() {
        let basic = AttributeExtractor::new(SearchVariant::Basic);
        assert_eq!(basic.extract("MacBook Air Used").condition.as_deref(), Some("Used"));

        let extended = AttributeExtractor::new(SearchVariant::FilterAware);
        assert_eq!(extended.extract("MacBook Air Used").condition, None);
        assert_eq!(
            extended
                .extract("iPad for parts or not working")
                .condition
                .as_deref(),
            Some("For Parts or Not Working")
        );
    }

    #[test]
    fn price_with_symbol_and_separators() {
        assert_eq!(extract_price("$1,234.56"), Some(dec!(1234.56)));
        assert_eq!(extract_price("US $89"), Some(dec!(89)));
        assert_eq!(extract_price("£12.5 to £20.00"), Some(dec!(12.5)));
    }

    #[test]
    fn unparseable_first_number_is_not_skipped() {
        let text = format!("{} or $5", "9".repeat(32));
        assert_eq!(extract_price(&text), None);
    }

    #[test]
    fn missing_price_is_none() {
        assert_eq!(extract_price("No price"), None);
        assert_eq!(extract_price(""), None);
    }
}
