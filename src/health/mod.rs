//! Financial Health Score engine.
//!
//! # Components
//!
//! - **Calculator**: pure scoring of the four ERP aggregates
//! - **Report**: score, category, per-metric breakdown and recommendations
//! - **Service**: resolves aggregates from an injected data source

pub mod calculator;
pub mod report;
pub mod service;

pub use calculator::*;
pub use report::*;
pub use service::*;
