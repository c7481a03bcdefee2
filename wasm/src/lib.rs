//! WebAssembly module for the Marketplace admin dashboard
//!
//! Provides client-side computation for:
//! - Period bucketing and cumulative growth series
//! - Category distribution
//! - Report cards and currency formatting
//! - The reports screen state reducer
//!
//! Structured values cross the boundary as JSON strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::state::{ReportAction, ReportState};
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("marketplace reports module loaded"));
}

fn to_js(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn parse_granularity(value: &str) -> Result<Granularity, String> {
    Granularity::from_str(value).map_err(|e| e.to_string())
}

// ============================================================================
// Bucketing and growth
// ============================================================================

fn bucket_key_impl(timestamp: &str, granularity: &str) -> Result<String, String> {
    let granularity = parse_granularity(granularity)?;
    shared::bucket_key_str(timestamp, granularity).map_err(|e| e.to_string())
}

/// Bucket label of an ISO-8601 timestamp, e.g. `"2025-W01"`
#[wasm_bindgen]
pub fn bucket_key(timestamp: &str, granularity: &str) -> Result<String, JsValue> {
    bucket_key_impl(timestamp, granularity).map_err(to_js)
}

fn user_growth_impl(buyers_json: &str, shops_json: &str, granularity: &str) -> Result<String, String> {
    let granularity = parse_granularity(granularity)?;
    let buyers: Vec<String> = parse_json("buyer timestamps", buyers_json)?;
    let shops: Vec<String> = parse_json("shop timestamps", shops_json)?;

    let keys = |timestamps: &[String]| -> Result<Vec<String>, String> {
        timestamps
            .iter()
            .map(|ts| shared::bucket_key_str(ts, granularity).map_err(|e| e.to_string()))
            .collect()
    };

    let series = shared::cumulative_growth_from_keys(keys(&buyers)?, keys(&shops)?);
    to_json(&series)
}

/// Cumulative buyer/seller series from two JSON arrays of creation timestamps
#[wasm_bindgen]
pub fn user_growth(buyers_json: &str, shops_json: &str, granularity: &str) -> Result<String, JsValue> {
    user_growth_impl(buyers_json, shops_json, granularity).map_err(to_js)
}

/// Point-to-point growth of the last two values, e.g. `"50.0"`
#[wasm_bindgen]
pub fn growth_label(values: &[u32]) -> String {
    let values: Vec<u64> = values.iter().map(|v| *v as u64).collect();
    shared::growth_label(&values)
}

// ============================================================================
// Aggregates
// ============================================================================

fn sales_summary_impl(orders_json: &str) -> Result<String, String> {
    let orders: Vec<OrderRecord> = parse_json("orders", orders_json)?;
    to_json(&shared::sales_metrics(&orders))
}

/// Total sales, order count and average order value for a JSON order list
#[wasm_bindgen]
pub fn sales_summary(orders_json: &str) -> Result<String, JsValue> {
    sales_summary_impl(orders_json).map_err(to_js)
}

/// Share of shops with at least one order
#[wasm_bindgen]
pub fn seller_engagement(order_shop_ids: Vec<String>, total_shops: i32) -> u32 {
    shared::seller_engagement(order_shop_ids.iter().map(String::as_str), total_shops as i64)
}

fn category_distribution_impl(products_json: &str) -> Result<String, String> {
    let products: Vec<ProductStock> = parse_json("products", products_json)?;
    to_json(&shared::category_distribution(&products))
}

/// Category shares of total stock, highest first
#[wasm_bindgen]
pub fn category_distribution(products_json: &str) -> Result<String, JsValue> {
    category_distribution_impl(products_json).map_err(to_js)
}

// ============================================================================
// Rendering and state
// ============================================================================

/// Currency label such as `"LKR 1,234.50"`
#[wasm_bindgen]
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let amount = Decimal::try_from(amount).unwrap_or(Decimal::ZERO);
    shared::format::format_currency(amount, currency_code)
}

fn render_report_impl(snapshot_json: &str, range: &str, month: &str, currency: &str) -> Result<String, String> {
    let snapshot: MetricSnapshot = parse_json("snapshot", snapshot_json)?;
    let range = shared::parse_trend_range(Some(range))?;
    let month = shared::parse_month_filter(Some(month))?;
    to_json(&shared::render::render_report(&snapshot, range, month, currency))
}

/// Report cards, summary lines and category bars for a snapshot
#[wasm_bindgen]
pub fn render_report(snapshot_json: &str, range: &str, month: &str, currency: &str) -> Result<String, JsValue> {
    render_report_impl(snapshot_json, range, month, currency).map_err(to_js)
}

fn reduce_report_state_impl(state_json: &str, action_json: &str) -> Result<String, String> {
    let state: ReportState = if state_json.trim().is_empty() {
        ReportState::default()
    } else {
        parse_json("state", state_json)?
    };
    let action: ReportAction = parse_json("action", action_json)?;
    to_json(&state.reduce(action))
}

/// Download name for a report exported today in the browser's local time
#[wasm_bindgen]
pub fn export_filename(range: &str) -> Result<String, JsValue> {
    let range = shared::parse_trend_range(Some(range)).map_err(|m| to_js(m.to_string()))?;
    let now = js_sys::Date::new_0();
    let today = chrono::NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .ok_or_else(|| to_js("Invalid local date".to_string()))?;
    Ok(shared::render::export_filename(range, today))
}

/// Apply one action to the reports screen state; an empty state starts fresh
#[wasm_bindgen]
pub fn reduce_report_state(state_json: &str, action_json: &str) -> Result<String, JsValue> {
    reduce_report_state_impl(state_json, action_json).map_err(to_js)
}
