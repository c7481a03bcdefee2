//! Shared reporting core for the marketplace admin dashboard
//!
//! Pure aggregation logic shared between the backend service and the
//! browser dashboard (via WASM): period bucketing, metric aggregation,
//! category distribution, report rendering and screen state.

pub mod distribution;
pub mod format;
pub mod metrics;
pub mod models;
pub mod period;
pub mod render;
pub mod state;
pub mod types;
pub mod validation;

pub use distribution::*;
pub use metrics::*;
pub use models::*;
pub use period::*;
pub use types::*;
pub use validation::*;
