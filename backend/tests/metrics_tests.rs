//! Tests for metric aggregation and category distribution

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    average_order_value, buyer_engagement, category_distribution, cumulative_growth,
    cumulative_growth_from_keys, growth_label, sales_metrics, seller_engagement, Granularity,
    OrderRecord, ProductStock,
};

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap()
}

fn order(shop: &str, price: i64) -> OrderRecord {
    OrderRecord {
        shop_id: Some(shop.to_string()),
        total_price: Some(Decimal::from(price)),
        created_at: utc(2024, 3, 1),
    }
}

fn product(category: Option<&str>, stock: Option<i64>) -> ProductStock {
    ProductStock {
        category: category.map(str::to_string),
        stock,
    }
}

// =============================================================================
// Sales and engagement
// =============================================================================

mod sales {
    use super::*;

    #[test]
    fn three_order_scenario() {
        let orders = vec![order("s1", 100), order("s1", 50), order("s2", 25)];
        let metrics = sales_metrics(&orders);

        assert_eq!(metrics.total_sales, Decimal::from(175));
        assert_eq!(metrics.order_count, 3);
        assert_eq!(metrics.average_order_value, Decimal::new(5833, 2));
        assert_eq!(buyer_engagement(metrics.order_count as i64, 2), 1);
    }

    #[test]
    fn average_order_value_without_orders_is_zero() {
        assert_eq!(average_order_value(Decimal::ZERO, 0), Decimal::ZERO);
        assert_eq!(average_order_value(Decimal::from(100), 4), Decimal::from(25));
    }

    #[test]
    fn seller_engagement_reference_values() {
        assert_eq!(seller_engagement(Vec::<&str>::new(), 0), 0);
        assert_eq!(seller_engagement(["a", "b", "c"], 4), 75);
        assert_eq!(seller_engagement(["a", "a", "a"], 2), 50);
    }
}

// =============================================================================
// Growth series
// =============================================================================

mod growth {
    use super::*;

    #[test]
    fn growth_label_reference_values() {
        assert_eq!(growth_label(&[]), "0.0");
        assert_eq!(growth_label(&[10]), "0.0");
        assert_eq!(growth_label(&[10, 15]), "50.0");
        assert_eq!(growth_label(&[0, 4]), "400.0");
        assert_eq!(growth_label(&[8, 6]), "-25.0");
    }

    #[test]
    fn cumulative_series_merges_both_tables() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let buyers = [utc(2024, 1, 3), utc(2024, 1, 20), utc(2024, 3, 2)];
        let shops = [utc(2024, 2, 14)];

        let series = cumulative_growth(&buyers, &shops, &offset, Granularity::Monthly);
        let periods: Vec<&str> = series.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, ["2024-01", "2024-02", "2024-03"]);

        let buyers: Vec<u64> = series.iter().map(|p| p.buyers).collect();
        let sellers: Vec<u64> = series.iter().map(|p| p.sellers).collect();
        assert_eq!(buyers, [2, 2, 3]);
        assert_eq!(sellers, [0, 1, 1]);
    }

    #[test]
    fn reporting_offset_moves_late_signups_to_next_month() {
        let colombo = FixedOffset::east_opt(330 * 60).unwrap();
        let late = [Utc.with_ymd_and_hms(2024, 3, 31, 20, 0, 0).unwrap()];

        let series = cumulative_growth(&late, &[], &colombo, Granularity::Monthly);
        assert_eq!(series[0].period, "2024-04");
    }

    proptest! {
        /// Running totals never decrease and end at the input sizes
        #[test]
        fn prop_cumulative_series_is_monotonic(
            buyer_keys in prop::collection::vec(0u8..24, 0..60),
            shop_keys in prop::collection::vec(0u8..24, 0..60),
        ) {
            let label = |k: &u8| format!("2024-{:02}", k % 12 + 1);
            let series = cumulative_growth_from_keys(
                buyer_keys.iter().map(label),
                shop_keys.iter().map(label),
            );

            for pair in series.windows(2) {
                prop_assert!(pair[0].period < pair[1].period);
                prop_assert!(pair[0].buyers <= pair[1].buyers);
                prop_assert!(pair[0].sellers <= pair[1].sellers);
            }
            if let Some(last) = series.last() {
                prop_assert_eq!(last.buyers, buyer_keys.len() as u64);
                prop_assert_eq!(last.sellers, shop_keys.len() as u64);
            }
        }
    }
}

// =============================================================================
// Category distribution
// =============================================================================

mod distribution {
    use super::*;

    #[test]
    fn reference_distribution() {
        let shares = category_distribution(&[
            product(Some("A"), Some(30)),
            product(Some("B"), Some(10)),
            product(Some("C"), Some(0)),
        ]);

        assert_eq!(shares.len(), 2);
        assert_eq!((shares[0].name.as_str(), shares[0].percentage), ("A", 75));
        assert_eq!((shares[1].name.as_str(), shares[1].percentage), ("B", 25));
        assert_eq!(shares[0].stock_count, 30);
    }

    #[test]
    fn missing_values_are_excluded() {
        let shares = category_distribution(&[
            product(None, Some(10)),
            product(Some("A"), None),
            product(Some(""), Some(5)),
            product(Some("B"), Some(5)),
        ]);

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].name, "B");
        assert_eq!(shares[0].percentage, 100);
    }

    #[test]
    fn zero_total_gives_empty_result() {
        assert!(category_distribution(&[]).is_empty());
        assert!(category_distribution(&[product(Some("A"), Some(0))]).is_empty());
    }

    #[test]
    fn independent_rounding_may_not_sum_to_100() {
        let shares = category_distribution(&[
            product(Some("A"), Some(1)),
            product(Some("B"), Some(1)),
            product(Some("C"), Some(1)),
        ]);
        let sum: u32 = shares.iter().map(|s| s.percentage).sum();
        assert_eq!(sum, 99);
    }

    proptest! {
        /// Percentages stay in 0..=100, are sorted, and sum close to 100
        #[test]
        fn prop_distribution_bounds(
            stock in prop::collection::vec((0usize..8, -5i64..1_000), 1..40),
        ) {
            let products: Vec<ProductStock> = stock
                .iter()
                .map(|(c, s)| product(Some(&format!("cat{}", c)), Some(*s)))
                .collect();
            let shares = category_distribution(&products);

            for share in &shares {
                prop_assert!(share.percentage <= 100);
                prop_assert!(share.stock_count > 0);
            }
            for pair in shares.windows(2) {
                prop_assert!(pair[0].percentage >= pair[1].percentage);
            }
            if !shares.is_empty() {
                let sum: u32 = shares.iter().map(|s| s.percentage).sum();
                let n = shares.len() as u32;
                prop_assert!(sum + n / 2 + 1 >= 100 && sum <= 100 + n / 2 + 1);
            }
        }
    }
}
