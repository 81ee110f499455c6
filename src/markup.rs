use scraper::{ElementRef, Html, Selector};

use crate::filters::{FilterDimension, FilterOptions};
use crate::listing::Candidate;

/// Present once search results have rendered.
pub const READY_SELECTOR: &str = ".s-item__title";

// Item containers, tried in order until one matches.
const ITEM_SELECTORS: [&str; 3] = ["div.s-item__info.clearfix", "div.s-item__info", "li.s-item"];
const TITLE_SELECTORS: [&str; 2] = ["span.s-item__title", "div.s-item__title"];
const PRICE_SELECTORS: [&str; 2] = ["span.s-item__price", "div.s-item__price"];

const REFINE_GROUP: &str = "li.x-refine__main__list";
const REFINE_HEADING: &str = ".x-refine__item";
const REFINE_OPTION: &str = ".cbx";

/// Title/price candidates from a search results page, in page order.
pub fn parse_candidates(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);

    for selector_str in &ITEM_SELECTORS {
        let Ok(item_selector) = Selector::parse(selector_str) else {
            continue;
        };

        let candidates: Vec<Candidate> = document
            .select(&item_selector)
            .map(|item| Candidate {
                title: text_from_selectors(item, &TITLE_SELECTORS),
                price_text: text_from_selectors(item, &PRICE_SELECTORS),
            })
            .collect();

        if !candidates.is_empty() {
            return candidates;
        }
    }

    Vec::new()
}

/// Reads the refinement panel and fills every dimension of `category` it
/// lists. Missing or empty groups keep their fallback options.
pub fn parse_filter_options(html: &str, category: &str) -> FilterOptions {
    let document = Html::parse_document(html);
    let mut options = FilterOptions::fallback(category);

    let (Ok(group_sel), Ok(option_sel)) =
        (Selector::parse(REFINE_GROUP), Selector::parse(REFINE_OPTION))
    else {
        return options;
    };

    let dims: Vec<FilterDimension> = options.dimensions().collect();
    for group in document.select(&group_sel) {
        let Some(heading) = text_from_selectors(group, &[REFINE_HEADING]) else {
            continue;
        };

        let Some(dim) = dims
            .iter()
            .copied()
            .filter(|d| *d != FilterDimension::Condition)
            .find(|d| heading_matches(&heading, d.site_headings()))
        else {
            continue;
        };

        let mut values: Vec<String> = Vec::new();
        for option in group.select(&option_sel) {
            let label = strip_count(&collapse_text(option));
            if !label.is_empty() && !values.contains(&label) {
                values.push(label);
            }
        }

        if !values.is_empty() {
            options.insert(dim, values);
        }
    }

    options
}

fn heading_matches(heading: &str, labels: &[&str]) -> bool {
    let heading = heading.to_lowercase();
    labels
        .iter()
        .any(|label| heading.starts_with(&label.to_lowercase()))
}

fn text_from_selectors(element: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for sel_str in selectors {
        if let Ok(selector) = Selector::parse(sel_str) {
            if let Some(found) = element.select(&selector).next() {
                let cleaned = collapse_text(found);
                if !cleaned.is_empty() {
                    return Some(cleaned);
                }
            }
        }
    }
    None
}

fn collapse_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// "256 GB (1,204)" -> "256 GB"
fn strip_count(label: &str) -> String {
    match label.rfind(" (") {
        Some(idx) if label.ends_with(')') => label[..idx].trim().to_string(),
        _ => label.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"
        <html><body><ul>
          <li class="s-item">
            <div class="s-item__info clearfix">
              <div class="s-item__title"><span>Shop on eBay</span></div>
              <span class="s-item__price">$20.00</span>
            </div>
          </li>
          <li class="s-item">
            <div class="s-item__info clearfix">
              <span class="s-item__title">iPhone 13   256GB
                 Gold</span>
              <span class="s-item__price">$612.00</span>
            </div>
          </li>
          <li class="s-item">
            <div class="s-item__info clearfix">
              <span class="s-item__title">No price here</span>
            </div>
          </li>
        </ul></body></html>
    "#;

    #[test]
    fn candidates_follow_page_order() {
        let candidates = parse_candidates(RESULTS);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].title.as_deref(), Some("Shop on eBay"));
        assert_eq!(candidates[1], Candidate::new("iPhone 13 256GB Gold", "$612.00"));
        assert_eq!(candidates[2].price_text, None);
    }

    #[test]
    fn falls_back_to_list_items() {
        let html = r#"<ul><li class="s-item"><span class="s-item__title">Pixel 8</span>
            <div class="s-item__price">$350</div></li></ul>"#;

        let candidates = parse_candidates(html);

        assert_eq!(candidates, vec![Candidate::new("Pixel 8", "$350")]);
    }

    #[test]
    fn no_items_yields_nothing() {
        assert!(parse_candidates("<html><body><p>Nothing</p></body></html>").is_empty());
    }

    #[test]
    fn refinement_panel_supplies_options() {
        let html = r#"
            <ul>
              <li class="x-refine__main__list">
                <div class="x-refine__item">Storage Capacity</div>
                <span class="cbx">128 GB (1,204)</span>
                <span class="cbx">256 GB (876)</span>
                <span class="cbx">256 GB (2)</span>
              </li>
              <li class="x-refine__main__list">
                <div class="x-refine__item">Color</div>
              </li>
              <li class="x-refine__main__list">
                <div class="x-refine__item">Condition</div>
                <span class="cbx">Brand New (5)</span>
              </li>
            </ul>"#;

        let options = parse_filter_options(html, "phone");

        assert_eq!(options.get(FilterDimension::Storage), ["128 GB", "256 GB"]);
        assert_eq!(
            options.get(FilterDimension::Color),
            FilterDimension::Color.fallback_options().as_slice()
        );
        assert_eq!(options.get(FilterDimension::Condition)[0], "New");
    }
}
