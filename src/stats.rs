use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::listing::ListingRecord;

/// Number of leading records the statistics are computed over.
pub const STATS_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceStatistics {
    pub count: usize,
    pub average: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

/// Statistics over the first [`STATS_WINDOW`] records. `None` when there
/// are no records.
pub fn summarize(records: &[ListingRecord]) -> Option<PriceStatistics> {
    summarize_window(records, STATS_WINDOW)
}

pub fn summarize_window(records: &[ListingRecord], window: usize) -> Option<PriceStatistics> {
    let prices: Vec<Decimal> = records.iter().take(window).map(|r| r.price).collect();
    let count = prices.len();
    if count == 0 {
        return None;
    }

    let total: Decimal = prices.iter().sum();
    let min = prices.iter().min().copied()?;
    let max = prices.iter().max().copied()?;

    Some(PriceStatistics {
        count,
        average: round2(total / Decimal::from(count)),
        min: round2(min),
        max: round2(max),
    })
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(price: Decimal) -> ListingRecord {
        ListingRecord {
            name: format!("item {price}"),
            price,
            storage: None,
            color: None,
            condition: None,
        }
    }

    #[test]
    fn only_first_thirty_records_count() {
        // 1..=30 then five outliers that must be ignored
        let mut records: Vec<ListingRecord> = (1..=30).map(|p| record(Decimal::from(p))).collect();
        records.extend((0..5).map(|_| record(dec!(10000))));

        let stats = summarize(&records).unwrap();

        assert_eq!(stats.count, 30);
        assert_eq!(stats.average, dec!(15.50));
        assert_eq!(stats.min, dec!(1));
        assert_eq!(stats.max, dec!(30));
    }

    #[test]
    fn average_is_rounded_to_cents() {
        let records = vec![record(dec!(10)), record(dec!(10)), record(dec!(10.01))];
        let stats = summarize(&records).unwrap();
        assert_eq!(stats.average, dec!(10.00));

        let records = vec![record(dec!(0.005)), record(dec!(0.005))];
        assert_eq!(summarize(&records).unwrap().average, dec!(0.01));
    }

    #[test]
    fn short_sequences_use_every_record() {
        let records = vec![record(dec!(99.999)), record(dec!(50))];
        let stats = summarize(&records).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max, dec!(100.00));
        assert_eq!(stats.min, dec!(50));
    }

    #[test]
    fn empty_input_has_no_statistics() {
        assert_eq!(summarize(&[]), None);
    }
}
