//! Reporting service for the admin dashboard and sales reports
//!
//! Each metric group is fetched and computed on its own. A failing query
//! degrades only its group to an empty result; the other groups still report.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use shared::models::{
    BuyerMetrics, CategoryShare, DashboardSummary, GrowthPoint, MetricGroup, MetricGroupKind,
    MetricSnapshot, SalesTrend, SellerMetrics, TopSeller,
};
use shared::render::{render_report, ReportView};
use shared::types::{Granularity, MonthFilter, TrendRange};
use shared::{
    buyer_change, buyer_engagement, category_distribution, cumulative_growth, growth_label,
    rank_shops_by_orders, round_one_decimal, sales_metrics, sales_trend, seller_engagement,
    seller_growth, top_sellers, trend_window_start,
};

use crate::config::ReportingConfig;
use crate::error::{AppError, AppResult};
use crate::services::store::ReportStore;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService<S> {
    store: S,
    settings: ReportingConfig,
}

/// Rendered report together with the numbers behind it
#[derive(Debug, Serialize)]
pub struct ReportPayload {
    pub view: ReportView,
    pub snapshot: MetricSnapshot,
}

/// Log a failed group and fall back to its empty result
fn degrade(kind: MetricGroupKind, result: AppResult<MetricGroup>) -> MetricGroup {
    result.unwrap_or_else(|e| {
        tracing::warn!(group = kind.as_str(), error = %e, "Metric group unavailable");
        kind.empty()
    })
}

fn or_default<T: Default>(what: &str, result: AppResult<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(metric = what, error = %e, "Dashboard metric unavailable");
        T::default()
    })
}

impl<S: ReportStore> ReportingService<S> {
    pub fn new(store: S, settings: ReportingConfig) -> Self {
        Self { store, settings }
    }

    fn offset(&self) -> FixedOffset {
        self.settings.offset()
    }

    // ========================================================================
    // Metric groups
    // ========================================================================

    pub async fn sales_group(&self) -> MetricGroup {
        let result = async {
            let orders = self.store.fetch_orders().await?;
            Ok::<_, AppError>(MetricGroup::Sales(sales_metrics(&orders)))
        }
        .await;
        degrade(MetricGroupKind::Sales, result)
    }

    pub async fn buyers_group(&self) -> MetricGroup {
        let result = async {
            let (orders, buyers) = tokio::join!(self.store.count_orders(), self.store.count_buyers());
            let (orders, buyers) = (orders?, buyers?);
            let engagement = buyer_engagement(orders, buyers);

            Ok::<_, AppError>(MetricGroup::Buyers(BuyerMetrics {
                buyer_count: buyers,
                buyer_engagement: engagement,
                change: buyer_change(engagement, buyers),
            }))
        }
        .await;
        degrade(MetricGroupKind::Buyers, result)
    }

    pub async fn sellers_group(&self, granularity: Granularity) -> MetricGroup {
        let result = async {
            let (orders, shops, signups) = tokio::join!(
                self.store.fetch_orders(),
                self.store.count_shops(),
                self.store.fetch_shop_signups(),
            );
            let (orders, shops, signups) = (orders?, shops?, signups?);

            let series = cumulative_growth(&[], &signups, &self.offset(), granularity);
            let shop_ids = orders.iter().filter_map(|o| o.shop_id.as_deref());

            Ok::<_, AppError>(MetricGroup::Sellers(SellerMetrics {
                seller_count: shops,
                seller_engagement: seller_engagement(shop_ids, shops),
                change: round_one_decimal(seller_growth(&series)),
            }))
        }
        .await;
        degrade(MetricGroupKind::Sellers, result)
    }

    pub async fn trend_group(
        &self,
        range: TrendRange,
        month: MonthFilter,
        now: DateTime<Utc>,
    ) -> MetricGroup {
        let result = async {
            let offset = self.offset();
            let since = trend_window_start(&now.with_timezone(&offset), range).with_timezone(&Utc);
            let orders = self.store.fetch_orders_since(since).await?;
            Ok::<_, AppError>(MetricGroup::Trend(sales_trend(&orders, range, month, now, &offset)))
        }
        .await;
        degrade(MetricGroupKind::Trend, result)
    }

    pub async fn categories_group(&self) -> MetricGroup {
        let result = async {
            let products = self.store.fetch_product_stock().await?;
            Ok::<_, AppError>(MetricGroup::Categories(category_distribution(&products)))
        }
        .await;
        degrade(MetricGroupKind::Categories, result)
    }

    /// Compute every metric group concurrently and assemble the snapshot
    pub async fn build_snapshot(&self, range: TrendRange, month: MonthFilter) -> MetricSnapshot {
        self.build_snapshot_at(range, month, Utc::now()).await
    }

    pub async fn build_snapshot_at(
        &self,
        range: TrendRange,
        month: MonthFilter,
        now: DateTime<Utc>,
    ) -> MetricSnapshot {
        let granularity = range.granularity();
        let (sales, buyers, sellers, trend, categories) = tokio::join!(
            self.sales_group(),
            self.buyers_group(),
            self.sellers_group(granularity),
            self.trend_group(range, month, now),
            self.categories_group(),
        );

        MetricSnapshot::from_groups([sales, buyers, sellers, trend, categories])
    }

    /// Snapshot plus the rendered cards for the reports screen
    pub async fn report_view(&self, range: TrendRange, month: MonthFilter) -> ReportPayload {
        let snapshot = self.build_snapshot(range, month).await;
        let view = render_report(&snapshot, range, month, &self.settings.currency);
        ReportPayload { view, snapshot }
    }

    /// Sales trend for a range, used by the trend endpoint and its CSV export
    pub async fn sales_trend(&self, range: TrendRange, month: MonthFilter) -> SalesTrend {
        match self.trend_group(range, month, Utc::now()).await {
            MetricGroup::Trend(trend) => trend,
            _ => SalesTrend::default(),
        }
    }

    pub async fn category_distribution(&self) -> Vec<CategoryShare> {
        match self.categories_group().await {
            MetricGroup::Categories(categories) => categories,
            _ => Vec::new(),
        }
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Cumulative buyer and seller signups per bucket
    pub async fn user_growth(&self, granularity: Granularity) -> Vec<GrowthPoint> {
        let result = async {
            let (buyers, shops) = tokio::join!(
                self.store.fetch_buyer_signups(),
                self.store.fetch_shop_signups(),
            );
            Ok::<_, AppError>(cumulative_growth(&buyers?, &shops?, &self.offset(), granularity))
        }
        .await;
        or_default("user_growth", result)
    }

    /// Shops with the most orders, merged with their profiles
    pub async fn top_sellers(&self) -> Vec<TopSeller> {
        let result = async {
            let orders = self.store.fetch_orders().await?;
            let ranked = rank_shops_by_orders(&orders, self.settings.top_seller_limit);
            let ids: Vec<String> = ranked.iter().map(|(id, _)| id.clone()).collect();
            let profiles = self.store.fetch_shop_profiles(&ids).await?;
            Ok::<_, AppError>(top_sellers(&ranked, &profiles))
        }
        .await;
        or_default("top_sellers", result)
    }

    pub async fn dashboard_summary(&self, granularity: Granularity) -> DashboardSummary {
        let (buyers, shops, active, collections, growth, sellers) = tokio::join!(
            self.store.count_buyers(),
            self.store.count_shops(),
            self.store.count_products(Some(1)),
            self.store.count_products(None),
            self.user_growth(granularity),
            self.top_sellers(),
        );

        let buyer_values: Vec<u64> = growth.iter().map(|p| p.buyers).collect();
        let seller_values: Vec<u64> = growth.iter().map(|p| p.sellers).collect();

        DashboardSummary {
            total_buyers: or_default("total_buyers", buyers),
            total_sellers: or_default("total_sellers", shops),
            active_products: or_default("active_products", active),
            total_collections: or_default("total_collections", collections),
            buyer_growth: growth_label(&buyer_values),
            seller_growth: growth_label(&seller_values),
            user_growth: growth,
            top_sellers: sellers,
        }
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
