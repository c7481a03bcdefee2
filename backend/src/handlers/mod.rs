//! HTTP handlers

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod reporting;

pub use auth::login;
pub use dashboard::{get_dashboard, get_user_growth};
pub use health::health_check;
pub use reporting::{
    export_report, get_category_distribution, get_metrics, get_report_view, get_sales_trend,
};
