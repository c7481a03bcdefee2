//! Business logic services for the Marketplace Reports service

pub mod auth;
pub mod chart;
pub mod export;
pub mod reporting;
pub mod store;

pub use auth::AuthService;
pub use reporting::ReportingService;
pub use store::{PgReportStore, ReportStore};
