//! Read-only access to the marketplace tables used by reporting
//!
//! Services talk to [`ReportStore`] so tests can swap PostgreSQL for an
//! in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{OrderRecord, ProductStock, ShopProfile};

use crate::error::AppResult;

/// Stored admin login
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminCredential {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn fetch_orders(&self) -> AppResult<Vec<OrderRecord>>;

    /// Orders created at or after `since`
    async fn fetch_orders_since(&self, since: DateTime<Utc>) -> AppResult<Vec<OrderRecord>>;

    async fn count_orders(&self) -> AppResult<i64>;

    async fn count_buyers(&self) -> AppResult<i64>;

    /// Buyer creation times, oldest first
    async fn fetch_buyer_signups(&self) -> AppResult<Vec<DateTime<Utc>>>;

    async fn count_shops(&self) -> AppResult<i64>;

    /// Shop creation times, oldest first
    async fn fetch_shop_signups(&self) -> AppResult<Vec<DateTime<Utc>>>;

    async fn fetch_shop_profiles(&self, shop_ids: &[String]) -> AppResult<Vec<ShopProfile>>;

    async fn fetch_product_stock(&self) -> AppResult<Vec<ProductStock>>;

    /// Number of products, optionally only those with stock above a threshold
    async fn count_products(&self, stock_above: Option<i64>) -> AppResult<i64>;

    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminCredential>>;

    async fn find_admin_by_id(&self, admin_id: Uuid) -> AppResult<Option<AdminCredential>>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgReportStore {
    db: PgPool,
}

impl PgReportStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

type OrderRow = (Option<String>, Option<Decimal>, DateTime<Utc>);

fn into_order((shop_id, total_price, created_at): OrderRow) -> OrderRecord {
    OrderRecord {
        shop_id,
        total_price,
        created_at,
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn fetch_orders(&self) -> AppResult<Vec<OrderRecord>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT shop_id, total_price, created_at FROM orders ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(into_order).collect())
    }

    async fn fetch_orders_since(&self, since: DateTime<Utc>) -> AppResult<Vec<OrderRecord>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT shop_id, total_price, created_at
            FROM orders
            WHERE created_at >= $1
            ORDER BY created_at
            "#,
        )
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(into_order).collect())
    }

    async fn count_orders(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_buyers(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM buyers")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn fetch_buyer_signups(&self) -> AppResult<Vec<DateTime<Utc>>> {
        let signups = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM buyers ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(signups)
    }

    async fn count_shops(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shops")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn fetch_shop_signups(&self) -> AppResult<Vec<DateTime<Utc>>> {
        let signups = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM shops ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(signups)
    }

    async fn fetch_shop_profiles(&self, shop_ids: &[String]) -> AppResult<Vec<ShopProfile>> {
        if shop_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (String, Option<String>, Option<String>, Option<String>)>(
            r#"
            SELECT shop_id, shop_name, nickname, profile_photo
            FROM shops
            WHERE shop_id = ANY($1)
            "#,
        )
        .bind(shop_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(shop_id, shop_name, nickname, profile_photo)| ShopProfile {
                shop_id,
                shop_name,
                nickname,
                profile_photo,
            })
            .collect())
    }

    async fn fetch_product_stock(&self) -> AppResult<Vec<ProductStock>> {
        let rows = sqlx::query_as::<_, (Option<String>, Option<i64>)>(
            "SELECT category, stock FROM products",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, stock)| ProductStock { category, stock })
            .collect())
    }

    async fn count_products(&self, stock_above: Option<i64>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE $1::BIGINT IS NULL OR stock > $1",
        )
        .bind(stock_above)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminCredential>> {
        let admin = sqlx::query_as::<_, AdminCredential>(
            "SELECT id, email, password_hash FROM admin WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(admin)
    }

    async fn find_admin_by_id(&self, admin_id: Uuid) -> AppResult<Option<AdminCredential>> {
        let admin = sqlx::query_as::<_, AdminCredential>(
            "SELECT id, email, password_hash FROM admin WHERE id = $1",
        )
        .bind(admin_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(admin)
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store with per-table failure injection

    use std::collections::HashSet;

    use super::*;
    use crate::error::AppError;

    #[derive(Default, Clone)]
    pub struct MemoryStore {
        pub orders: Vec<OrderRecord>,
        pub buyer_signups: Vec<DateTime<Utc>>,
        pub shop_signups: Vec<DateTime<Utc>>,
        pub shops: Vec<ShopProfile>,
        pub products: Vec<ProductStock>,
        pub admins: Vec<AdminCredential>,
        pub failing: HashSet<&'static str>,
    }

    impl MemoryStore {
        /// Make every query against `table` fail
        pub fn failing(mut self, table: &'static str) -> Self {
            self.failing.insert(table);
            self
        }

        fn check(&self, table: &'static str) -> AppResult<()> {
            if self.failing.contains(table) {
                return Err(AppError::Internal(format!("{} query failed", table)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ReportStore for MemoryStore {
        async fn fetch_orders(&self) -> AppResult<Vec<OrderRecord>> {
            self.check("orders")?;
            Ok(self.orders.clone())
        }

        async fn fetch_orders_since(&self, since: DateTime<Utc>) -> AppResult<Vec<OrderRecord>> {
            self.check("orders")?;
            Ok(self
                .orders
                .iter()
                .filter(|o| o.created_at >= since)
                .cloned()
                .collect())
        }

        async fn count_orders(&self) -> AppResult<i64> {
            self.check("orders")?;
            Ok(self.orders.len() as i64)
        }

        async fn count_buyers(&self) -> AppResult<i64> {
            self.check("buyers")?;
            Ok(self.buyer_signups.len() as i64)
        }

        async fn fetch_buyer_signups(&self) -> AppResult<Vec<DateTime<Utc>>> {
            self.check("buyers")?;
            Ok(self.buyer_signups.clone())
        }

        async fn count_shops(&self) -> AppResult<i64> {
            self.check("shops")?;
            Ok(self.shop_signups.len() as i64)
        }

        async fn fetch_shop_signups(&self) -> AppResult<Vec<DateTime<Utc>>> {
            self.check("shops")?;
            Ok(self.shop_signups.clone())
        }

        async fn fetch_shop_profiles(&self, shop_ids: &[String]) -> AppResult<Vec<ShopProfile>> {
            self.check("shops")?;
            Ok(self
                .shops
                .iter()
                .filter(|s| shop_ids.contains(&s.shop_id))
                .cloned()
                .collect())
        }

        async fn fetch_product_stock(&self) -> AppResult<Vec<ProductStock>> {
            self.check("products")?;
            Ok(self.products.clone())
        }

        async fn count_products(&self, stock_above: Option<i64>) -> AppResult<i64> {
            self.check("products")?;
            Ok(self
                .products
                .iter()
                .filter(|p| match stock_above {
                    Some(threshold) => p.stock.map_or(false, |s| s > threshold),
                    None => true,
                })
                .count() as i64)
        }

        async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminCredential>> {
            self.check("admin")?;
            Ok(self.admins.iter().find(|a| a.email == email).cloned())
        }

        async fn find_admin_by_id(&self, admin_id: Uuid) -> AppResult<Option<AdminCredential>> {
            self.check("admin")?;
            Ok(self.admins.iter().find(|a| a.id == admin_id).cloned())
        }
    }
}
