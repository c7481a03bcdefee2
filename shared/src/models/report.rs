//! Derived reporting entities
//!
//! Everything here is rebuilt on each refresh and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales totals over all orders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesMetrics {
    pub total_sales: Decimal,
    pub order_count: u64,
    /// `total_sales / order_count` to two decimals, zero without orders
    pub average_order_value: Decimal,
}

/// Buyer counts and the orders-minus-buyers engagement figure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuyerMetrics {
    pub buyer_count: i64,
    pub buyer_engagement: i64,
    /// Point-to-point growth of cumulative buyer signups, one decimal
    pub change: f64,
}

/// Seller counts and the share of sellers with at least one order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SellerMetrics {
    pub seller_count: i64,
    /// 0..=100 for consistent data
    pub seller_engagement: u32,
    /// Point-to-point growth of cumulative shop signups, one decimal
    pub change: f64,
}

/// One bucket of the sales trend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub name: String,
    pub sales: Decimal,
    pub orders: u64,
}

/// Sales trend buckets in chronological order of first appearance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesTrend {
    pub points: Vec<TrendPoint>,
    /// Point-to-point growth between the last two buckets' sales, one decimal
    pub change: f64,
}

/// One bucket of the cumulative user-growth series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrowthPoint {
    pub period: String,
    pub buyers: u64,
    pub sellers: u64,
}

/// A product category's share of total stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryShare {
    pub name: String,
    /// Rounded half-up, 0..=100
    pub percentage: u32,
    pub stock_count: i64,
}

/// A shop ranked by order count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopSeller {
    pub shop_id: String,
    pub shop_name: String,
    pub nickname: String,
    pub profile_photo: String,
    pub order_count: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PercentageChange {
    pub sales: f64,
    pub buyers: f64,
    pub sellers: f64,
}

/// The full report shown on the reports screen
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricSnapshot {
    pub total_sales: Decimal,
    pub order_count: u64,
    pub average_order_value: Decimal,
    pub buyer_count: i64,
    pub seller_count: i64,
    pub buyer_engagement: i64,
    pub seller_engagement: u32,
    pub percentage_change: PercentageChange,
    pub sales_trend: Vec<TrendPoint>,
    pub top_categories: Vec<CategoryShare>,
}

/// Independent metric groups. Each one owns a disjoint set of
/// [`MetricSnapshot`] fields, so groups can complete in any order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "group", content = "data", rename_all = "snake_case")]
pub enum MetricGroup {
    Sales(SalesMetrics),
    Buyers(BuyerMetrics),
    Sellers(SellerMetrics),
    Trend(SalesTrend),
    Categories(Vec<CategoryShare>),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroupKind {
    Sales,
    Buyers,
    Sellers,
    Trend,
    Categories,
}

impl MetricGroupKind {
    pub const ALL: [MetricGroupKind; 5] = [
        MetricGroupKind::Sales,
        MetricGroupKind::Buyers,
        MetricGroupKind::Sellers,
        MetricGroupKind::Trend,
        MetricGroupKind::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricGroupKind::Sales => "sales",
            MetricGroupKind::Buyers => "buyers",
            MetricGroupKind::Sellers => "sellers",
            MetricGroupKind::Trend => "trend",
            MetricGroupKind::Categories => "categories",
        }
    }

    /// The empty result a failed group degrades to
    pub fn empty(&self) -> MetricGroup {
        match self {
            MetricGroupKind::Sales => MetricGroup::Sales(SalesMetrics::default()),
            MetricGroupKind::Buyers => MetricGroup::Buyers(BuyerMetrics::default()),
            MetricGroupKind::Sellers => MetricGroup::Sellers(SellerMetrics::default()),
            MetricGroupKind::Trend => MetricGroup::Trend(SalesTrend::default()),
            MetricGroupKind::Categories => MetricGroup::Categories(Vec::new()),
        }
    }
}

impl MetricGroup {
    pub fn kind(&self) -> MetricGroupKind {
        match self {
            MetricGroup::Sales(_) => MetricGroupKind::Sales,
            MetricGroup::Buyers(_) => MetricGroupKind::Buyers,
            MetricGroup::Sellers(_) => MetricGroupKind::Sellers,
            MetricGroup::Trend(_) => MetricGroupKind::Trend,
            MetricGroup::Categories(_) => MetricGroupKind::Categories,
        }
    }
}

impl MetricSnapshot {
    /// Write one group's fields, leaving every other field untouched
    pub fn apply(&mut self, group: MetricGroup) {
        match group {
            MetricGroup::Sales(sales) => {
                self.total_sales = sales.total_sales;
                self.order_count = sales.order_count;
                self.average_order_value = sales.average_order_value;
            }
            MetricGroup::Buyers(buyers) => {
                self.buyer_count = buyers.buyer_count;
                self.buyer_engagement = buyers.buyer_engagement;
                self.percentage_change.buyers = buyers.change;
            }
            MetricGroup::Sellers(sellers) => {
                self.seller_count = sellers.seller_count;
                self.seller_engagement = sellers.seller_engagement;
                self.percentage_change.sellers = sellers.change;
            }
            MetricGroup::Trend(trend) => {
                self.sales_trend = trend.points;
                self.percentage_change.sales = trend.change;
            }
            MetricGroup::Categories(categories) => {
                self.top_categories = categories;
            }
        }
    }

    /// Reset one group's fields to their empty defaults
    pub fn reset(&mut self, kind: MetricGroupKind) {
        self.apply(kind.empty());
    }

    /// Assemble a snapshot from completed groups
    pub fn from_groups(groups: impl IntoIterator<Item = MetricGroup>) -> Self {
        let mut snapshot = Self::default();
        for group in groups {
            snapshot.apply(group);
        }
        snapshot
    }
}

/// Headline numbers for the dashboard screen
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_buyers: i64,
    pub total_sellers: i64,
    /// Products with more than one unit in stock
    pub active_products: i64,
    /// All product listings
    pub total_collections: i64,
    pub buyer_growth: String,
    pub seller_growth: String,
    pub user_growth: Vec<GrowthPoint>,
    pub top_sellers: Vec<TopSeller>,
}
