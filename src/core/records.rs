//! ERP records consumed by the health score engine.
//!
//! These are the rows the storage collaborator hands over: the financial
//! summary for the current period, the monthly series, inventory items and
//! invoices. Only the fields the scoring needs are modelled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// PERIOD
// ═══════════════════════════════════════════════════════════════════════════════

/// Aggregation window of a financial summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Calendar month
    #[default]
    Monthly,
    /// Calendar quarter
    Quarterly,
    /// Calendar year
    Yearly,
    /// Arbitrary date range
    Custom,
}

impl Period {
    /// Get period name
    pub fn name(&self) -> &'static str {
        match self {
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
            Period::Custom => "custom",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(Period::Monthly),
            "quarterly" | "quarter" => Ok(Period::Quarterly),
            "yearly" | "year" | "annual" => Ok(Period::Yearly),
            "custom" => Ok(Period::Custom),
            _ => Err(Error::InvalidParameter {
                name: "period".into(),
                reason: format!("unknown period '{}'", s),
            }),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FINANCIAL SUMMARY
// ═══════════════════════════════════════════════════════════════════════════════

/// Revenue, expenses and profit for the current period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// Total revenue
    pub revenue: f64,
    /// Total expenses
    pub expenses: f64,
    /// Profit as recorded (not re-derived)
    pub profit: f64,
    /// Aggregation window
    #[serde(default)]
    pub period: Period,
}

impl FinancialSummary {
    /// Create a summary with explicit figures
    pub fn new(revenue: f64, expenses: f64, profit: f64) -> Self {
        Self {
            revenue,
            expenses,
            profit,
            period: Period::default(),
        }
    }

    /// Create a summary whose profit is revenue minus expenses
    pub fn from_totals(revenue: f64, expenses: f64, period: Period) -> Self {
        Self {
            revenue,
            expenses,
            profit: revenue - expenses,
            period,
        }
    }

    /// Reject non-finite figures
    pub fn validate(&self) -> Result<()> {
        validate_finite("revenue", self.revenue)?;
        validate_finite("expenses", self.expenses)?;
        validate_finite("profit", self.profit)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MONTHLY SERIES
// ═══════════════════════════════════════════════════════════════════════════════

/// One month of the financial time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFinancial {
    /// Month label, e.g. "2024-03" or "Mar"
    pub month: String,
    /// Revenue for the month
    pub revenue: f64,
    /// Expenses for the month
    pub expenses: f64,
    /// Profit for the month
    pub profit: f64,
}

impl MonthlyFinancial {
    /// Create a month whose profit is revenue minus expenses
    pub fn new(month: impl Into<String>, revenue: f64, expenses: f64) -> Self {
        Self {
            month: month.into(),
            revenue,
            expenses,
            profit: revenue - expenses,
        }
    }

    /// Validate label and figures
    pub fn validate(&self) -> Result<()> {
        if self.month.trim().is_empty() {
            return Err(Error::InvalidParameter {
                name: "month".into(),
                reason: "label cannot be empty".into(),
            });
        }
        validate_finite("revenue", self.revenue)?;
        validate_finite("expenses", self.expenses)?;
        validate_finite("profit", self.profit)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════════════

/// Stock-keeping item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Item identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Units on hand
    pub quantity: u32,
    /// Threshold at or below which the item needs reordering
    pub reorder_level: u32,
    /// Price per unit
    #[serde(default)]
    pub unit_price: f64,
}

impl InventoryItem {
    /// Create an item with zero unit price
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32, reorder_level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            reorder_level,
            unit_price: 0.0,
        }
    }

    /// Whether stock has fallen to the reorder level
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Validate identifier and price
    pub fn validate(&self) -> Result<()> {
        validate_id("item id", &self.id)?;
        validate_finite("unitPrice", self.unit_price)?;
        if self.unit_price < 0.0 {
            return Err(Error::InvalidParameter {
                name: "unitPrice".into(),
                reason: format!("{} is negative", self.unit_price),
            });
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INVOICES
// ═══════════════════════════════════════════════════════════════════════════════

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Not yet sent
    Draft,
    /// Sent and awaiting payment
    #[default]
    Pending,
    /// Settled
    Paid,
    /// Past its due date without payment
    Overdue,
}

impl InvoiceStatus {
    /// Get status name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "pending" | "sent" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(Error::InvalidParameter {
                name: "status".into(),
                reason: format!("unknown invoice status '{}'", s),
            }),
        }
    }
}

/// Customer invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice identifier
    pub id: String,
    /// Customer name
    pub customer: String,
    /// Invoice total
    pub amount: f64,
    /// Current status
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Payment due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Invoice {
    /// Create an invoice without a due date
    pub fn new(id: impl Into<String>, customer: impl Into<String>, amount: f64, status: InvoiceStatus) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            amount,
            status,
            due_date: None,
        }
    }

    /// Whether the invoice counts against accounts receivable
    pub fn is_overdue(&self) -> bool {
        self.status == InvoiceStatus::Overdue
    }

    /// Validate identifier and amount
    pub fn validate(&self) -> Result<()> {
        validate_id("invoice id", &self.id)?;
        validate_finite("amount", self.amount)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALIDATION HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn validate_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidParameter {
            name: name.into(),
            reason: format!("{} is not a finite number", value),
        });
    }
    Ok(())
}

fn validate_id(name: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::InvalidParameter {
            name: name.into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(())
}
