//! Health service: resolves the four aggregates and scores them.

use std::sync::Arc;

use tracing::{debug, warn};

use super::calculator::compute_health_report;
use super::report::HealthReport;
use crate::core::records::{FinancialSummary, MonthlyFinancial};
use crate::core::snapshot::{InventorySnapshot, InvoiceSnapshot};
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// DATA SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Read access to the ERP aggregates the score is built from
pub trait ErpDataSource: Send + Sync {
    /// Summary for the current period, if one has been recorded
    fn financial_summary(&self) -> Result<Option<FinancialSummary>>;

    /// Monthly series, oldest first
    fn monthly_series(&self) -> Result<Vec<MonthlyFinancial>>;

    /// Current stock levels
    fn inventory_snapshot(&self) -> Result<InventorySnapshot>;

    /// Current invoice status counts
    fn invoice_snapshot(&self) -> Result<InvoiceSnapshot>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH SERVICE
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes the financial health report from an injected data source
#[derive(Clone)]
pub struct HealthService {
    source: Arc<dyn ErpDataSource>,
}

impl HealthService {
    /// Create service over a data source
    pub fn new(source: Arc<dyn ErpDataSource>) -> Self {
        Self { source }
    }

    /// Compute the current report.
    ///
    /// Fails with [`Error::FinancialDataNotFound`] before any scoring when no
    /// summary exists.
    pub fn financial_health(&self) -> Result<HealthReport> {
        let financial = match self.source.financial_summary()? {
            Some(summary) => summary,
            None => {
                warn!("Financial health requested without a financial summary");
                return Err(Error::FinancialDataNotFound);
            }
        };
        let series = self.source.monthly_series()?;
        let inventory = self.source.inventory_snapshot()?;
        let invoices = self.source.invoice_snapshot()?;

        let report = compute_health_report(&financial, &series, &inventory, &invoices);
        report.verify()?;

        debug!(
            score = report.score,
            category = %report.category,
            months = series.len(),
            "Computed financial health"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService").finish_non_exhaustive()
    }
}
