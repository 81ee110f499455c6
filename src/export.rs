use chrono::Local;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::listing::ListingRecord;

const COLUMNS: [&str; 5] = ["name", "price", "storage", "color", "condition"];

fn file_prefix(category: &str) -> String {
    format!("{category}_sold_items_")
}

// attribute columns empty for every record are left out
pub fn save_to_csv(records: &[ListingRecord], category: &str, dir: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{}{timestamp}.csv", file_prefix(category)));

    let columns: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|col| match *col {
            "storage" => records.iter().any(|r| r.storage.is_some()),
            "color" => records.iter().any(|r| r.color.is_some()),
            "condition" => records.iter().any(|r| r.condition.is_some()),
            _ => true,
        })
        .collect();

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(&columns)?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| match *col {
                "name" => record.name.clone(),
                "price" => record.price.normalize().to_string(),
                "storage" => record.storage.clone().unwrap_or_default(),
                "color" => record.color.clone().unwrap_or_default(),
                _ => record.condition.clone().unwrap_or_default(),
            })
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = records.len(), "results saved");
    Ok(path)
}

pub fn latest_export(category: &str, dir: &Path) -> Option<PathBuf> {
    let prefix = file_prefix(category);
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(error = %e, dir = %dir.display(), "cannot list export directory");
            return None;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(&prefix) && name.ends_with(".csv")
        })
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            let stamp = meta
                .created()
                .or_else(|_| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Some((stamp, entry.path()))
        })
        // ties broken by name, which embeds the timestamp
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, path)| path)
}

/// Like [`save_to_csv`], but a failed write is only logged.
pub fn save_results(records: &[ListingRecord], category: &str, dir: &Path) -> Option<PathBuf> {
    match save_to_csv(records, category, dir) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, dir = %dir.display(), "could not save results");
            None
        }
    }
}

pub fn load_recent_results(category: &str, dir: &Path) -> Result<Option<Vec<ListingRecord>>> {
    let Some(path) = latest_export(category, dir) else {
        return Ok(None);
    };
    debug!(path = %path.display(), "loading export");
    read_csv(&path).map(Some)
}

pub fn read_csv(path: &Path) -> Result<Vec<ListingRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let (Some(name_idx), Some(price_idx)) = (position("name"), position("price")) else {
        warn!(path = %path.display(), "export is missing name/price columns");
        return Ok(Vec::new());
    };
    let storage_idx = position("storage");
    let color_idx = position("color");
    let condition_idx = position("condition");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let Some(price) = row.get(price_idx).and_then(|p| Decimal::from_str(p.trim()).ok()) else {
            warn!(row = ?row.position().map(|p| p.line()), "skipping row with bad price");
            continue;
        };

        records.push(ListingRecord {
            name: row.get(name_idx).unwrap_or_default().to_string(),
            price,
            storage: optional(storage_idx),
            color: optional(color_idx),
            condition: optional(condition_idx),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn records() -> Vec<ListingRecord> {
        vec![
            ListingRecord {
                name: "iPhone 13, 256GB Gold".into(),
                price: dec!(612.50),
                storage: Some("256GB".into()),
                color: Some("Gold".into()),
                condition: None,
            },
            ListingRecord {
                name: "iPhone 12".into(),
                price: dec!(1234),
                storage: None,
                color: None,
                condition: None,
            },
        ]
    }

    #[test]
    fn round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_to_csv(&records(), "phone", dir.path()).unwrap();

        let name = saved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("phone_sold_items_"));
        assert!(name.ends_with(".csv"));
        // phone_sold_items_YYYYMMDD_HHMMSS.csv
        assert_eq!(name.len(), "phone_sold_items_".len() + 15 + 4);

        let loaded = load_recent_results("phone", dir.path()).unwrap().unwrap();
        assert_eq!(loaded, records());
    }

    #[test]
    fn empty_attribute_columns_are_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_to_csv(&records(), "phone", dir.path()).unwrap();

        let contents = fs::read_to_string(saved).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(header, "name,price,storage,color");
    }

    #[test]
    fn newest_matching_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("phone_sold_items_20240101_000000.csv");
        fs::write(&old, "name,price\nOld phone,10\n").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let new = dir.path().join("phone_sold_items_20240102_000000.csv");
        fs::write(&new, "name,price,color\nNew phone,20,Black\n").unwrap();
        fs::write(dir.path().join("laptop_sold_items_20250101_000000.csv"), "name,price\nX,1\n")
            .unwrap();

        assert_eq!(latest_export("phone", dir.path()), Some(new));

        let loaded = load_recent_results("phone", dir.path()).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].color.as_deref(), Some("Black"));
    }

    #[test]
    fn failed_save_is_logged_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not").join("there");

        assert_eq!(save_results(&records(), "phone", &missing), None);
        assert!(save_results(&records(), "phone", dir.path()).is_some());
    }

    #[test]
    fn no_exports_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_recent_results("phone", dir.path()).unwrap().is_none());
        assert!(load_recent_results("phone", &dir.path().join("missing")).unwrap().is_none());
    }
}
