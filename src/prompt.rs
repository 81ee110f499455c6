use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

use crate::error::Result;
use crate::filters::{FilterDimension, FilterOptions};

/// Input that ends filter prompting for the remaining dimensions.
pub const SKIP_ALL: &str = "skip";

pub fn prompt_category() -> Result<String> {
    loop {
        let category: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter the electronic device type (e.g., phone, laptop, tablet)")
            .interact_text()?;
        let category = category.trim().to_string();
        if !category.is_empty() {
            return Ok(category);
        }
    }
}

/// Asks for option indices per dimension. Returns raw input for
/// [`crate::filters::normalize`].
pub fn prompt_selection(options: &FilterOptions) -> Result<Vec<(FilterDimension, String)>> {
    let theme = ColorfulTheme::default();
    let mut raw = Vec::new();

    for dim in options.dimensions() {
        let available = options.get(dim);
        if available.is_empty() {
            continue;
        }

        println!("\nAvailable {dim} options:");
        for (i, option) in available.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }

        let answer = loop {
            let input: String = Input::with_theme(&theme)
                .with_prompt(format!(
                    "Select {dim} (numbers separated by commas, Enter to skip, '{SKIP_ALL}' to finish)"
                ))
                .allow_empty(true)
                .interact_text()?;

            match classify(&input) {
                Answer::Retry => println!("Please enter option numbers like 1 or 1,3."),
                other => break other,
            }
        };

        match answer {
            Answer::SkipAll => break,
            Answer::Indices(input) => raw.push((dim, input)),
            Answer::Empty | Answer::Retry => {}
        }
    }

    Ok(raw)
}

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Empty,
    SkipAll,
    Retry,
    Indices(String),
}

// Only input without any digit is re-asked; partially bad input is left for
// normalization to reject.
fn classify(input: &str) -> Answer {
    let input = input.trim();
    if input.is_empty() {
        Answer::Empty
    } else if input.eq_ignore_ascii_case(SKIP_ALL) {
        Answer::SkipAll
    } else if !input.chars().any(|c| c.is_ascii_digit()) {
        Answer::Retry
    } else {
        Answer::Indices(input.to_string())
    }
}
