//! Report view model
//!
//! Turns a [`MetricSnapshot`] into display-ready cards and lines. The browser
//! renders these directly and the PDF exporter reuses the same text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::{format_currency, format_number};
use crate::models::MetricSnapshot;
use crate::types::{MonthFilter, TrendRange};

pub const REPORT_TITLE: &str = "Sales & Analytics Report";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
    Flat,
}

/// Change badge shown in a card's corner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeIndicator {
    pub direction: ChangeDirection,
    /// Absolute value of the change, one decimal
    pub magnitude: f64,
    /// Green when true, red otherwise
    pub positive: bool,
}

impl ChangeIndicator {
    pub fn from_change(value: f64) -> Self {
        let direction = if value > 0.0 {
            ChangeDirection::Up
        } else if value < 0.0 {
            ChangeDirection::Down
        } else {
            ChangeDirection::Flat
        };
        Self {
            direction,
            magnitude: value.abs(),
            positive: value >= 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub details: Vec<String>,
    pub change: ChangeIndicator,
}

/// One row of the category breakdown with its proportional bar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryBar {
    pub name: String,
    pub percentage: u32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportView {
    pub title: String,
    pub subtitle: String,
    pub cards: Vec<MetricCard>,
    pub summary: Vec<String>,
    pub categories: Vec<CategoryBar>,
    /// Shown in place of the category list when it is empty
    pub empty_message: Option<String>,
}

/// `"Yearly Report - March"`, or `"Daily Report"` without a month
pub fn report_subtitle(range: TrendRange, month: MonthFilter) -> String {
    match month.month_name() {
        Some(name) => format!("{} Report - {}", range.title(), name),
        None => format!("{} Report", range.title()),
    }
}

/// Download name of an exported report:
/// `sales_analytics_report_<range>_<YYYY-MM-DD>.pdf`
pub fn export_filename(range: TrendRange, date: NaiveDate) -> String {
    format!(
        "sales_analytics_report_{}_{}.pdf",
        range.as_str(),
        date.format("%Y-%m-%d")
    )
}

/// Key-metric lines for the summary grid, in display order
pub fn summary_lines(snapshot: &MetricSnapshot, currency: &str) -> Vec<String> {
    vec![
        format!("Total Sales: {}", format_currency(snapshot.total_sales, currency)),
        format!("Total Orders: {}", format_number(snapshot.order_count as i64)),
        format!(
            "Average Order Value: {}",
            format_currency(snapshot.average_order_value, currency)
        ),
        format!("Active Buyers: {}", format_number(snapshot.buyer_count)),
        format!("Active Sellers: {}", format_number(snapshot.seller_count)),
        format!("Buyer Engagement: {}", snapshot.buyer_engagement),
        format!("Seller Engagement: {}%", snapshot.seller_engagement),
    ]
}

pub fn category_bars(snapshot: &MetricSnapshot) -> Vec<CategoryBar> {
    snapshot
        .top_categories
        .iter()
        .map(|c| CategoryBar {
            name: c.name.clone(),
            percentage: c.percentage,
            label: format!(
                "{}: {}% ({} items)",
                c.name,
                c.percentage,
                format_number(c.stock_count)
            ),
        })
        .collect()
}

pub fn render_report(
    snapshot: &MetricSnapshot,
    range: TrendRange,
    month: MonthFilter,
    currency: &str,
) -> ReportView {
    let change = snapshot.percentage_change;

    let cards = vec![
        MetricCard {
            title: "Total Sales".to_string(),
            value: format_currency(snapshot.total_sales, currency),
            details: vec![
                format!("{} Orders", format_number(snapshot.order_count as i64)),
                format!("Avg. {}", format_currency(snapshot.average_order_value, currency)),
            ],
            change: ChangeIndicator::from_change(change.sales),
        },
        MetricCard {
            title: "Buyer Engagement".to_string(),
            value: format!("{} Buyers", format_number(snapshot.buyer_count)),
            details: vec![format!("Orders vs Buyers: {}", snapshot.buyer_engagement)],
            change: ChangeIndicator::from_change(change.buyers),
        },
        MetricCard {
            title: "Seller Engagement".to_string(),
            value: format!("{} Sellers", format_number(snapshot.seller_count)),
            details: vec![format!("{}% Engagement Rate", snapshot.seller_engagement)],
            change: ChangeIndicator::from_change(change.sellers),
        },
    ];

    let categories = category_bars(snapshot);
    let empty_message = categories
        .is_empty()
        .then(|| "No categories found".to_string());

    ReportView {
        title: REPORT_TITLE.to_string(),
        subtitle: report_subtitle(range, month),
        cards,
        summary: summary_lines(snapshot, currency),
        categories,
        empty_message,
    }
}
