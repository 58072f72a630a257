//! Health report types.
//!
//! A report is recomputed on every read and never stored, so nothing here
//! carries an identity or timestamp.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH CATEGORY
// ═══════════════════════════════════════════════════════════════════════════════

/// Band the overall score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthCategory {
    /// Below 40
    Poor,
    /// 40 to 59
    Fair,
    /// 60 to 79
    Good,
    /// 80 and above
    Excellent,
}

impl HealthCategory {
    /// Get all categories, worst first
    pub fn all() -> &'static [HealthCategory] {
        &[
            HealthCategory::Poor,
            HealthCategory::Fair,
            HealthCategory::Good,
            HealthCategory::Excellent,
        ]
    }

    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthCategory::Poor => "Poor",
            HealthCategory::Fair => "Fair",
            HealthCategory::Good => "Good",
            HealthCategory::Excellent => "Excellent",
        }
    }

    /// Convert from score (0-100)
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => HealthCategory::Excellent,
            60..=79 => HealthCategory::Good,
            40..=59 => HealthCategory::Fair,
            _ => HealthCategory::Poor,
        }
    }

    /// Get minimum score for this category
    pub fn min_score(&self) -> u8 {
        match self {
            HealthCategory::Excellent => 80,
            HealthCategory::Good => 60,
            HealthCategory::Fair => 40,
            HealthCategory::Poor => 0,
        }
    }

    /// Fixed advice for this category, in display order
    pub fn recommendations(&self) -> [&'static str; 3] {
        match self {
            HealthCategory::Excellent => [
                "Consider expansion opportunities",
                "Invest in growth initiatives",
                "Review pricing strategy for optimization",
            ],
            HealthCategory::Good => [
                "Focus on increasing profit margins",
                "Look for ways to reduce operational costs",
                "Monitor inventory levels more closely",
            ],
            HealthCategory::Fair => [
                "Implement stricter expense controls",
                "Address accounts receivable issues",
                "Review pricing and product mix",
            ],
            HealthCategory::Poor => [
                "Prioritize cash flow management",
                "Reduce unnecessary expenses immediately",
                "Focus on collecting overdue payments",
            ],
        }
    }
}

impl std::fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH METRIC
// ═══════════════════════════════════════════════════════════════════════════════

/// The five scored metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthMetric {
    /// Profit over revenue
    ProfitMargin,
    /// Month-over-month revenue change
    RevenueGrowth,
    /// Expenses over revenue
    ExpenseManagement,
    /// Share of items above reorder level
    InventoryHealth,
    /// Share of invoices overdue
    AccountsReceivable,
}

impl HealthMetric {
    /// Get all metrics in report order
    pub fn all() -> &'static [HealthMetric] {
        &[
            HealthMetric::ProfitMargin,
            HealthMetric::RevenueGrowth,
            HealthMetric::ExpenseManagement,
            HealthMetric::InventoryHealth,
            HealthMetric::AccountsReceivable,
        ]
    }

    /// Maximum points this metric contributes
    pub fn max_score(&self) -> u8 {
        match self {
            HealthMetric::ProfitMargin => 30,
            HealthMetric::RevenueGrowth => 20,
            HealthMetric::ExpenseManagement => 15,
            HealthMetric::InventoryHealth => 15,
            HealthMetric::AccountsReceivable => 20,
        }
    }

    /// Key used in the JSON report
    pub fn key(&self) -> &'static str {
        match self {
            HealthMetric::ProfitMargin => "profitMargin",
            HealthMetric::RevenueGrowth => "revenueGrowth",
            HealthMetric::ExpenseManagement => "expenseManagement",
            HealthMetric::InventoryHealth => "inventoryHealth",
            HealthMetric::AccountsReceivable => "accountsReceivable",
        }
    }

    /// Get description
    pub fn description(&self) -> &'static str {
        match self {
            HealthMetric::ProfitMargin => "Profit as a share of revenue",
            HealthMetric::RevenueGrowth => "Revenue change over the last two months",
            HealthMetric::ExpenseManagement => "Expenses as a share of revenue",
            HealthMetric::InventoryHealth => "Items stocked above their reorder level",
            HealthMetric::AccountsReceivable => "Invoices not overdue",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// METRIC SCORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Score for a single metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScore {
    /// Points earned, within [0, max_score]
    pub score: u8,
    /// Raw ratio the points were derived from
    pub value: f64,
    /// Points available
    pub max_score: u8,
}

impl MetricScore {
    /// Score as a fraction of the maximum
    pub fn fraction(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.max_score)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete financial health report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall score (0-100)
    pub score: u8,
    /// Category derived from score
    pub category: HealthCategory,
    /// Per-metric breakdown
    pub metrics: BTreeMap<HealthMetric, MetricScore>,
    /// Advice for the category
    pub recommendations: Vec<String>,
}

impl HealthReport {
    /// Get the breakdown for one metric
    pub fn metric(&self, metric: HealthMetric) -> Option<&MetricScore> {
        self.metrics.get(&metric)
    }

    /// Metrics scoring below half of their maximum
    pub fn weak_metrics(&self) -> Vec<HealthMetric> {
        self.metrics
            .iter()
            .filter(|(_, m)| m.fraction() < 0.5)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Check the report's structural invariants
    pub fn verify(&self) -> Result<()> {
        let mut total: u32 = 0;

        for metric in HealthMetric::all() {
            let entry = self.metrics.get(metric).ok_or_else(|| {
                Error::InvariantViolation(format!("metric {} missing", metric.key()))
            })?;

            if entry.max_score != metric.max_score() {
                return Err(Error::InvariantViolation(format!(
                    "metric {} has max {} instead of {}",
                    metric.key(),
                    entry.max_score,
                    metric.max_score()
                )));
            }

            if entry.score > entry.max_score {
                return Err(Error::InvariantViolation(format!(
                    "metric {} scored {} above max {}",
                    metric.key(),
                    entry.score,
                    entry.max_score
                )));
            }

            if !entry.value.is_finite() {
                return Err(Error::InvariantViolation(format!(
                    "metric {} has non-finite value",
                    metric.key()
                )));
            }

            total += u32::from(entry.score);
        }

        if self.metrics.len() != HealthMetric::all().len() {
            return Err(Error::InvariantViolation(format!(
                "expected {} metrics, found {}",
                HealthMetric::all().len(),
                self.metrics.len()
            )));
        }

        if total != u32::from(self.score) || self.score > 100 {
            return Err(Error::InvariantViolation(format!(
                "score {} does not match metric sum {}",
                self.score, total
            )));
        }

        if self.category != HealthCategory::from_score(self.score) {
            return Err(Error::InvariantViolation(format!(
                "category {} does not match score {}",
                self.category, self.score
            )));
        }

        if self.recommendations.iter().map(String::as_str).ne(self.category.recommendations()) {
            return Err(Error::InvariantViolation(format!(
                "recommendations do not belong to category {}",
                self.category
            )));
        }

        Ok(())
    }
}
