use crate::filters::{ConditionCode, FilterDimension, FilterSelection};

/// Which search flavour to emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SearchVariant {
    /// Buy-It-Now only, basic condition vocabulary.
    Basic,
    /// Site-sourced filter options, extended condition vocabulary.
    #[default]
    FilterAware,
}

/// Renders the `_nkw` query plus fixed and condition parameters.
///
/// Total: every selection, including an empty one, yields a well-formed
/// query string without spaces.
pub fn build(category: &str, selection: &FilterSelection, variant: SearchVariant) -> String {
    let mut terms: Vec<&str> = vec![category.trim()];
    let mut conditions: Vec<&str> = Vec::new();

    for (dim, values) in selection.iter() {
        if dim == FilterDimension::Condition {
            conditions.extend(values.iter().map(String::as_str));
        } else {
            terms.extend(values.iter().map(String::as_str));
        }
    }

    let keywords = terms.join(" ").replace(' ', "+");

    let mut params = vec![
        format!("_nkw={keywords}"),
        "LH_Sold=1".to_string(),
        "LH_Complete=1".to_string(),
        "rt=nc".to_string(),
    ];

    if variant == SearchVariant::Basic {
        params.push("LH_BIN=1".to_string());
    }

    let codes: Vec<String> = conditions
        .iter()
        .filter_map(|label| ConditionCode::from_label(label))
        .map(|c| c.code().to_string())
        .collect();

    if !codes.is_empty() {
        params.push(format!("LH_ItemCondition={}", codes.join("|")));
    }

    params.join("&")
}

pub fn search_url(
    base_url: &str,
    category: &str,
    selection: &FilterSelection,
    variant: SearchVariant,
) -> String {
    format!(
        "{}/sch/i.html?{}",
        base_url.trim_end_matches('/'),
        build(category, selection, variant)
    )
}
