use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Storage,
    Color,
    Processor,
    Ram,
    Type,
    Resolution,
    Condition,
}

impl FilterDimension {
    pub fn name(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Color => "color",
            Self::Processor => "processor",
            Self::Ram => "ram",
            Self::Type => "type",
            Self::Resolution => "resolution",
            Self::Condition => "condition",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let dim = match name.trim().to_ascii_lowercase().as_str() {
            "storage" => Self::Storage,
            "color" | "colour" => Self::Color,
            "processor" | "cpu" => Self::Processor,
            "ram" | "memory" => Self::Ram,
            "type" => Self::Type,
            "resolution" => Self::Resolution,
            "condition" => Self::Condition,
            _ => return None,
        };
        Some(dim)
    }

    pub fn site_headings(self) -> &'static [&'static str] {
        match self {
            Self::Storage => &["Storage Capacity", "Hard Drive Capacity", "SSD Capacity"],
            Self::Color => &["Color"],
            Self::Processor => &["Processor"],
            Self::Ram => &["RAM Size"],
            Self::Type => &["Type"],
            Self::Resolution => &["Maximum Resolution", "Effective Pixels"],
            Self::Condition => &["Condition"],
        }
    }

    pub fn fallback_options(self) -> Vec<String> {
        let opts: &[&str] = match self {
            Self::Storage => &["64GB", "128GB", "256GB", "512GB", "1TB"],
            Self::Color => &[
                "Black", "White", "Gold", "Silver", "Gray", "Rose Gold", "Blue", "Red",
            ],
            Self::Processor => &[
                "Intel Core i5",
                "Intel Core i7",
                "Apple M1",
                "Apple M2",
                "AMD Ryzen 7",
            ],
            Self::Ram => &["8GB", "16GB", "32GB"],
            Self::Type => &["DSLR", "Mirrorless", "Point and Shoot"],
            Self::Resolution => &["12MP", "20MP", "24MP", "45MP"],
            Self::Condition => {
                return ConditionCode::ALL
                    .iter()
                    .map(|c| c.label().to_string())
                    .collect();
            }
        };
        opts.iter().map(|s| s.to_string()).collect()
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The marketplace's numeric item-condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCode {
    New,
    OpenBox,
    CertifiedRefurbished,
    SellerRefurbished,
    PreOwned,
    ForParts,
}

impl ConditionCode {
    pub const ALL: [ConditionCode; 6] = [
        Self::New,
        Self::OpenBox,
        Self::CertifiedRefurbished,
        Self::SellerRefurbished,
        Self::PreOwned,
        Self::ForParts,
    ];

    pub fn code(self) -> u16 {
        match self {
            Self::New => 1000,
            Self::OpenBox => 1500,
            Self::CertifiedRefurbished => 2000,
            Self::SellerRefurbished => 2500,
            Self::PreOwned => 3000,
            Self::ForParts => 7000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::OpenBox => "Open Box",
            Self::CertifiedRefurbished => "Certified Refurbished",
            Self::SellerRefurbished => "Seller Refurbished",
            Self::PreOwned => "Pre-owned",
            Self::ForParts => "For Parts or Not Working",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

static CATEGORY_DIMENSIONS: LazyLock<HashMap<&'static str, Vec<FilterDimension>>> =
    LazyLock::new(|| {
        use FilterDimension::*;
        HashMap::from([
            ("phone", vec![Storage, Color, Condition]),
            ("laptop", vec![Processor, Ram, Storage, Condition]),
            ("tablet", vec![Storage, Color, Condition]),
            ("smartwatch", vec![Color, Condition]),
            ("camera", vec![Type, Resolution, Condition]),
        ])
    });

/// Dimensions a user may filter on for `category`. Unknown categories only
/// get `condition`.
pub fn resolve(category: &str) -> Vec<FilterDimension> {
    let key = category.trim().to_lowercase();
    match CATEGORY_DIMENSIONS.get(key.as_str()) {
        Some(dims) => dims.clone(),
        None => vec![FilterDimension::Condition],
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    options: Vec<(FilterDimension, Vec<String>)>,
}

impl FilterOptions {
    pub fn fallback(category: &str) -> Self {
        let options = resolve(category)
            .into_iter()
            .map(|dim| (dim, dim.fallback_options()))
            .collect();
        Self { options }
    }

    pub fn insert(&mut self, dim: FilterDimension, values: Vec<String>) {
        match self.options.iter_mut().find(|(d, _)| *d == dim) {
            Some((_, existing)) => *existing = values,
            None => self.options.push((dim, values)),
        }
    }

    pub fn get(&self, dim: FilterDimension) -> &[String] {
        self.options
            .iter()
            .find(|(d, _)| *d == dim)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn dimensions(&self) -> impl Iterator<Item = FilterDimension> + '_ {
        self.options.iter().map(|(d, _)| *d)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    entries: Vec<(FilterDimension, Vec<String>)>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    // empty value lists are not recorded
    pub fn set<I, S>(&mut self, dim: FilterDimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(d, _)| *d == dim) {
            Some((_, existing)) => existing.extend(values),
            None => self.entries.push((dim, values)),
        }
    }

    pub fn with<I, S>(mut self, dim: FilterDimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(dim, values);
        self
    }

    pub fn get(&self, dim: FilterDimension) -> &[String] {
        self.entries
            .iter()
            .find(|(d, _)| *d == dim)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterDimension, &[String])> {
        self.entries.iter().map(|(d, v)| (*d, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves 1-based index input such as `"1, 3"`. A dimension with any bad
/// index is left unset.
pub fn normalize(options: &FilterOptions, raw: &[(FilterDimension, String)]) -> FilterSelection {
    let mut selection = FilterSelection::new();

    for (dim, input) in raw {
        let available = options.get(*dim);
        let mut picked = Vec::new();
        let mut valid = true;

        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse::<usize>() {
                Ok(idx) if idx >= 1 && idx <= available.len() => {
                    picked.push(available[idx - 1].clone());
                }
                _ => {
                    valid = false;
                    break;
                }
            }
        }

        if valid {
            selection.set(*dim, picked);
        } else {
            tracing::debug!(dimension = %dim, input = %input, "ignoring invalid option selection");
        }
    }

    selection
}
