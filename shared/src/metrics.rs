//! Metric aggregation
//!
//! Pure functions that turn raw store rows into report metrics. Two bucketing
//! passes live here and must stay separate:
//!
//! - the cumulative user-growth series, keyed by [`crate::period`] labels over
//!   buyer and shop signups;
//! - the sales trend, keyed by hour / calendar date / month name over orders
//!   inside a lookback window.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, DateTime, Duration, FixedOffset, Months, TimeZone, Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::format::{format_percent, month_name};
use crate::models::{
    GrowthPoint, OrderRecord, SalesMetrics, SalesTrend, ShopProfile, TopSeller, TrendPoint,
};
use crate::period::bucket_key_at;
use crate::types::{Granularity, MonthFilter, TrendRange};

// ============================================================================
// Cumulative user growth
// ============================================================================

/// Build the cumulative buyer/seller growth series.
///
/// Each signup list is counted per bucket; the union of bucket labels is
/// walked in sorted order while running totals accumulate, so both series are
/// monotonically non-decreasing.
pub fn cumulative_growth(
    buyer_signups: &[DateTime<Utc>],
    shop_signups: &[DateTime<Utc>],
    offset: &FixedOffset,
    granularity: Granularity,
) -> Vec<GrowthPoint> {
    cumulative_growth_from_keys(
        buyer_signups
            .iter()
            .map(|ts| bucket_key_at(ts, offset, granularity)),
        shop_signups
            .iter()
            .map(|ts| bucket_key_at(ts, offset, granularity)),
    )
}

/// Same as [`cumulative_growth`] for records already mapped to bucket labels
pub fn cumulative_growth_from_keys<B, S>(buyer_keys: B, shop_keys: S) -> Vec<GrowthPoint>
where
    B: IntoIterator<Item = String>,
    S: IntoIterator<Item = String>,
{
    // (buyers, shops) per bucket; BTreeMap keeps the union sorted
    let mut per_bucket: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for key in buyer_keys {
        per_bucket.entry(key).or_default().0 += 1;
    }
    for key in shop_keys {
        per_bucket.entry(key).or_default().1 += 1;
    }

    let mut buyers = 0u64;
    let mut sellers = 0u64;
    per_bucket
        .into_iter()
        .map(|(period, (new_buyers, new_sellers))| {
            buyers += new_buyers;
            sellers += new_sellers;
            GrowthPoint {
                period,
                buyers,
                sellers,
            }
        })
        .collect()
}

// ============================================================================
// Growth percentage
// ============================================================================

/// `(latest - previous) / previous * 100`, with a zero denominator read as 1
pub fn growth_percentage(previous: f64, latest: f64) -> f64 {
    let denominator = if previous == 0.0 { 1.0 } else { previous };
    (latest - previous) / denominator * 100.0
}

/// Growth between the last two values, or 0 with fewer than two.
///
/// This is a point-to-point change badge, not a trend statistic.
pub fn last_growth(values: &[f64]) -> f64 {
    match values {
        [.., previous, latest] => growth_percentage(*previous, *latest),
        _ => 0.0,
    }
}

/// [`last_growth`] formatted to one decimal, e.g. `"50.0"`
pub fn growth_label(values: &[u64]) -> String {
    let values: Vec<f64> = values.iter().map(|v| *v as f64).collect();
    format_percent(last_growth(&values))
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Seller growth between the last two points of a cumulative series
pub fn seller_growth(series: &[GrowthPoint]) -> f64 {
    let values: Vec<f64> = series.iter().map(|p| p.sellers as f64).collect();
    last_growth(&values)
}

// ============================================================================
// Sales and engagement
// ============================================================================

/// Total, count and average over every order; missing prices count as zero
pub fn sales_metrics(orders: &[OrderRecord]) -> SalesMetrics {
    let total_sales: Decimal = orders.iter().map(OrderRecord::amount).sum();
    let order_count = orders.len() as u64;

    SalesMetrics {
        total_sales,
        order_count,
        average_order_value: average_order_value(total_sales, order_count),
    }
}

/// Average order value to two decimals; zero when there are no orders
pub fn average_order_value(total_sales: Decimal, order_count: u64) -> Decimal {
    if order_count == 0 {
        return Decimal::ZERO;
    }
    (total_sales / Decimal::from(order_count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Orders minus buyers. A raw difference, not a ratio.
pub fn buyer_engagement(total_orders: i64, total_buyers: i64) -> i64 {
    total_orders - total_buyers
}

/// Buyer change badge: engagement relative to the buyer count, one decimal;
/// zero when there are no buyers
pub fn buyer_change(engagement: i64, total_buyers: i64) -> f64 {
    if total_buyers <= 0 {
        return 0.0;
    }
    round_one_decimal(engagement as f64 / total_buyers as f64 * 100.0)
}

/// Percentage of shops with at least one order, rounded to the nearest
/// integer; zero when there are no shops
pub fn seller_engagement<'a, I>(order_shop_ids: I, total_shops: i64) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    if total_shops <= 0 {
        return 0;
    }
    let active: HashSet<&str> = order_shop_ids
        .into_iter()
        .filter(|id| !id.is_empty())
        .collect();
    (active.len() as f64 / total_shops as f64 * 100.0).round() as u32
}

// ============================================================================
// Sales trend
// ============================================================================

/// Lower bound on order creation time for a trend range: the last 24 hours,
/// the last calendar month, or the last calendar year
pub fn trend_window_start<Tz: TimeZone>(now: &DateTime<Tz>, range: TrendRange) -> DateTime<Tz> {
    let months = match range {
        TrendRange::Daily => return now.clone() - Duration::hours(24),
        TrendRange::Monthly => 1,
        TrendRange::Yearly => 12,
    };
    now.clone()
        .checked_sub_months(Months::new(months))
        .unwrap_or_else(|| now.clone() - Duration::days(31 * months as i64))
}

/// Trend bucket label: `"14:00"` for daily, `"3/18/2024"` for monthly and
/// the month name for yearly
pub fn trend_key<Tz: TimeZone>(timestamp: &DateTime<Tz>, range: TrendRange) -> String {
    match range {
        TrendRange::Daily => format!("{}:00", timestamp.hour()),
        TrendRange::Monthly => format!(
            "{}/{}/{}",
            timestamp.month(),
            timestamp.day(),
            timestamp.year()
        ),
        TrendRange::Yearly => month_name(timestamp.month())
            .unwrap_or_default()
            .to_string(),
    }
}

/// Sum sales and count orders per trend bucket.
///
/// Orders older than the range's window are dropped first; for the yearly
/// range the month filter narrows further. Buckets appear in the order their
/// first order was created.
pub fn sales_trend(
    orders: &[OrderRecord],
    range: TrendRange,
    month: MonthFilter,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> SalesTrend {
    let start = trend_window_start(&now.with_timezone(offset), range).with_timezone(&Utc);

    let mut window: Vec<&OrderRecord> = orders.iter().filter(|o| o.created_at >= start).collect();
    window.sort_by_key(|o| o.created_at);

    let mut points: Vec<TrendPoint> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for order in window {
        let local = order.created_at.with_timezone(offset);
        if range == TrendRange::Yearly && !month.includes(local.month()) {
            continue;
        }

        let key = trend_key(&local, range);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            points.push(TrendPoint {
                name: key,
                sales: Decimal::ZERO,
                orders: 0,
            });
            points.len() - 1
        });
        points[slot].sales += order.amount();
        points[slot].orders += 1;
    }

    let sales: Vec<f64> = points
        .iter()
        .map(|p| p.sales.to_f64().unwrap_or(0.0))
        .collect();

    SalesTrend {
        change: round_one_decimal(last_growth(&sales)),
        points,
    }
}

// ============================================================================
// Top sellers
// ============================================================================

/// Shops ranked by order count, descending; ties broken by shop id.
/// Orders without a shop are ignored.
pub fn rank_shops_by_orders(orders: &[OrderRecord], limit: usize) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for shop_id in orders.iter().filter_map(|o| o.shop_id.as_deref()) {
        if !shop_id.is_empty() {
            *counts.entry(shop_id).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(id, count)| (id.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Merge ranked shop ids with their profiles, keeping the ranking order
pub fn top_sellers(ranked: &[(String, u64)], profiles: &[ShopProfile]) -> Vec<TopSeller> {
    ranked
        .iter()
        .map(|(shop_id, order_count)| {
            let profile = profiles.iter().find(|p| &p.shop_id == shop_id);
            TopSeller {
                shop_id: shop_id.clone(),
                shop_name: profile
                    .and_then(|p| p.shop_name.clone())
                    .unwrap_or_else(|| "Unknown Shop".to_string()),
                nickname: profile.and_then(|p| p.nickname.clone()).unwrap_or_default(),
                profile_photo: profile
                    .and_then(|p| p.profile_photo.clone())
                    .unwrap_or_default(),
                order_count: *order_count,
            }
        })
        .collect()
}
