//! Category distribution: each product category's share of total stock

use std::collections::BTreeMap;

use crate::models::{CategoryShare, ProductStock};

/// Compute stock share per category, sorted by percentage descending.
///
/// Products with a missing or blank category, or with missing or
/// non-positive stock, are excluded. Each percentage is rounded half-up on
/// its own, so the shares can sum to slightly more or less than 100. Returns
/// an empty list when no stock remains.
pub fn category_distribution(products: &[ProductStock]) -> Vec<CategoryShare> {
    // Sums of BIGINT stock can exceed i64
    let mut per_category: BTreeMap<&str, i128> = BTreeMap::new();
    let mut total: i128 = 0;

    for product in products {
        let (Some(category), Some(stock)) = (product.category.as_deref(), product.stock) else {
            continue;
        };
        let category = category.trim();
        if category.is_empty() || stock <= 0 {
            continue;
        }
        *per_category.entry(category).or_default() += i128::from(stock);
        total += i128::from(stock);
    }

    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = per_category
        .into_iter()
        .map(|(name, stock)| CategoryShare {
            name: name.to_string(),
            percentage: rounded_percentage(stock, total),
            stock_count: i64::try_from(stock).unwrap_or(i64::MAX),
        })
        .collect();

    // Stable sort: equal percentages stay in name order
    shares.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    shares
}

/// `round(part / total * 100)` with halves rounded up, in integer arithmetic
fn rounded_percentage(part: i128, total: i128) -> u32 {
    ((part * 200 + total) / (total * 2)) as u32
}
