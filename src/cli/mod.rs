//! bizpulse Command Line Interface.
//!
//! Offline scoring of ERP data sets exported as JSON.

pub mod output;

pub use output::*;

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::health::{HealthReport, HealthService};
use crate::storage::SeedData;

/// Score the data set stored in a JSON file
pub fn score_file(path: &Path) -> Result<HealthReport> {
    let seed = SeedData::from_file(path)?;
    HealthService::new(Arc::new(seed)).financial_health()
}
