//! # bizpulse
//!
//! Financial health scoring for small-business ERP data.
//!
//! ## Architecture
//!
//! - **Core**: ERP records, derived snapshots and service configuration
//! - **Health**: the Financial Health Score engine and its service
//! - **Storage**: key/value backends and the ERP repository
//! - **API**: axum router serving `GET /financial-health`
//! - **CLI**: offline scoring and report formatting
//!
//! ## Example
//!
//! ```rust
//! use bizpulse::prelude::*;
//!
//! let report = compute_health_report(
//!     &FinancialSummary::new(24_500.0, 16_300.0, 8_200.0),
//!     &[
//!         MonthlyFinancial::new("2024-05", 24_800.0, 16_000.0),
//!         MonthlyFinancial::new("2024-06", 24_500.0, 16_300.0),
//!     ],
//!     &InventorySnapshot::new(5, 2),
//!     &InvoiceSnapshot::new(3, 0),
//! );
//!
//! assert_eq!(report.score, 64);
//! assert_eq!(report.category, HealthCategory::Good);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

#[cfg(feature = "rpc-server")]
pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod health;
pub mod storage;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        config::{ServerConfig, StorageKind},
        records::{FinancialSummary, InventoryItem, Invoice, InvoiceStatus, MonthlyFinancial, Period},
        snapshot::{InventorySnapshot, InvoiceSnapshot},
    };
    pub use crate::error::{Error, Result};
    pub use crate::health::{
        calculator::compute_health_report,
        report::{HealthCategory, HealthMetric, HealthReport, MetricScore},
        service::{ErpDataSource, HealthService},
    };
    pub use crate::storage::{ErpRepository, FileStore, InMemoryStore, SeedData};
}

/// Service version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name
pub const SERVICE_NAME: &str = "bizpulse";
