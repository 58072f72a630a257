//! Count snapshots derived from inventory and invoice lists.

use serde::{Deserialize, Serialize};

use super::records::{InventoryItem, Invoice};

/// Inventory stock levels as seen by the scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    /// Number of distinct items
    pub total_item_count: u64,
    /// Items at or below their reorder level
    pub low_stock_item_count: u64,
}

impl InventorySnapshot {
    /// Create snapshot from counts
    pub fn new(total_item_count: u64, low_stock_item_count: u64) -> Self {
        Self {
            total_item_count,
            low_stock_item_count,
        }
    }

    /// Count items and low-stock items
    pub fn from_items(items: &[InventoryItem]) -> Self {
        Self {
            total_item_count: items.len() as u64,
            low_stock_item_count: items.iter().filter(|i| i.is_low_stock()).count() as u64,
        }
    }
}

/// Invoice status counts as seen by the scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSnapshot {
    /// Number of invoices
    pub total_invoice_count: u64,
    /// Invoices with status overdue
    pub overdue_invoice_count: u64,
}

impl InvoiceSnapshot {
    /// Create snapshot from counts
    pub fn new(total_invoice_count: u64, overdue_invoice_count: u64) -> Self {
        Self {
            total_invoice_count,
            overdue_invoice_count,
        }
    }

    /// Count invoices and overdue invoices
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        Self {
            total_invoice_count: invoices.len() as u64,
            overdue_invoice_count: invoices.iter().filter(|i| i.is_overdue()).count() as u64,
        }
    }
}
