use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::error;
use tracing_subscriber::EnvFilter;

use sold_scraper::browser::{ChromeSession, HttpSession, Session};
use sold_scraper::config::{Config, Engine};
use sold_scraper::filters::FilterOptions;
use sold_scraper::scrape::{self, RawSelection};
use sold_scraper::{ListingRecord, PriceStatistics, export, prompt, stats};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sold_scraper=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let category = match &config.category {
        Some(c) => c.trim().to_string(),
        None if config.no_prompt => anyhow::bail!("no category given and prompting is disabled"),
        None => prompt::prompt_category().context("reading device type")?,
    };

    if config.last {
        return show_last(&config, &category);
    }

    let session = start_session(&config)
        .await
        .context("setting up the browser session")?;

    let choose = (!config.no_prompt || !config.selections.is_empty()).then(|| {
        |options: &FilterOptions| -> sold_scraper::Result<RawSelection> {
            if !config.selections.is_empty() {
                return Ok(config.selections.clone());
            }
            println!("\nPlease choose filters for your {category}:");
            prompt::prompt_selection(options)
        }
    });

    let records = scrape::run_with_session(session, config.scrape_settings(), &category, choose)
        .await
        .context("scraping sold listings")?;

    report(&config, &category, &records)
}

async fn start_session(config: &Config) -> sold_scraper::Result<Session> {
    match config.engine {
        Engine::Chrome => Ok(Session::Chrome(
            ChromeSession::start(&config.chrome_options()).await?,
        )),
        Engine::Http => Ok(Session::Http(HttpSession::new(config.wait_timeout())?)),
    }
}

fn report(config: &Config, category: &str, records: &[ListingRecord]) -> Result<()> {
    let summary = stats::summarize(records);

    if config.json {
        print_json(records, summary.as_ref())?;
    } else if records.is_empty() {
        println!("\nNo results found matching your criteria.");
    } else {
        print_records(records);
        if let Some(summary) = &summary {
            print_statistics(summary);
        }
    }

    if !records.is_empty() {
        if let Some(path) = export::save_results(records, category, &config.output_dir) {
            if !config.json {
                println!("\n💾 Results have been saved to {}", path.display());
            }
        }
    }

    Ok(())
}

fn show_last(config: &Config, category: &str) -> Result<()> {
    let Some(records) = export::load_recent_results(category, &config.output_dir)
        .context("loading previous results")?
    else {
        println!("No saved results for {category} in {}", config.output_dir.display());
        return Ok(());
    };

    let summary = stats::summarize(&records);
    if config.json {
        return print_json(&records, summary.as_ref());
    }

    print_records(&records);
    match &summary {
        Some(summary) => print_statistics(summary),
        None => println!("\nThe saved file has no listings."),
    }
    Ok(())
}

fn print_records(records: &[ListingRecord]) {
    println!("\n{}", "-".repeat(60));
    println!("SOLD LISTINGS ({})", records.len());
    println!("{}", "-".repeat(60));

    for (i, record) in records.iter().enumerate() {
        println!("\n{}. {}", i + 1, record.name);
        println!("   💰 Price: ${:.2}", record.price);

        let attrs: Vec<String> = [
            ("Storage", &record.storage),
            ("Color", &record.color),
            ("Condition", &record.condition),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| format!("{label}: {v}")))
        .collect();
        if !attrs.is_empty() {
            println!("   🏷  {}", attrs.join(" | "));
        }
    }
}

fn print_statistics(summary: &PriceStatistics) {
    println!("\n{}", "=".repeat(60));
    println!("📊 PRICE SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Based on the {} most recent listings", summary.count);
    println!("Average price: ${:.2}", summary.average);
    println!("Lowest price:  ${:.2}", summary.min);
    println!("Highest price: ${:.2}", summary.max);
}

fn print_json(records: &[ListingRecord], summary: Option<&PriceStatistics>) -> Result<()> {
    let out = json!({
        "records": records,
        "statistics": summary,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
