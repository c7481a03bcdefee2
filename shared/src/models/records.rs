//! Source rows read from the marketplace data store
//!
//! The store owns these tables; reporting only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order as seen by reporting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    pub shop_id: Option<String>,
    /// Missing prices count as zero
    pub total_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn amount(&self) -> Decimal {
        self.total_price.unwrap_or(Decimal::ZERO)
    }
}

/// Category and stock of a product listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductStock {
    pub category: Option<String>,
    pub stock: Option<i64>,
}

/// Public profile of a shop, used to label top sellers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopProfile {
    pub shop_id: String,
    pub shop_name: Option<String>,
    pub nickname: Option<String>,
    pub profile_photo: Option<String>,
}
