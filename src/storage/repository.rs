//! ERP repository over a storage backend.
//!
//! Stands in for the relational store of the wider ERP: it keeps the
//! financial summary, the monthly series, inventory items and invoices, and
//! serves them to the health service through [`ErpDataSource`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

use tracing::info;

use super::backend::{make_key, prefixes, StorageBackend, TypedStore};
use crate::core::records::{FinancialSummary, InventoryItem, Invoice, MonthlyFinancial};
use crate::core::snapshot::{InventorySnapshot, InvoiceSnapshot};
use crate::error::{Error, Result};
use crate::health::service::ErpDataSource;

const CURRENT_SUMMARY: &[u8] = b"current";

// ═══════════════════════════════════════════════════════════════════════════════
// SEED DATA
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete ERP data set as a JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    /// Summary for the current period
    pub financial_summary: Option<FinancialSummary>,
    /// Monthly series, oldest first
    pub monthly_series: Vec<MonthlyFinancial>,
    /// Inventory items
    pub inventory: Vec<InventoryItem>,
    /// Invoices
    pub invoices: Vec<Invoice>,
}

impl SeedData {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: Self = serde_json::from_str(json)
            .map_err(|e| Error::Deserialization(format!("Invalid seed data: {}", e)))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Read from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Storage(format!("Failed to read seed file {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Validate every record
    pub fn validate(&self) -> Result<()> {
        if let Some(summary) = &self.financial_summary {
            summary.validate()?;
        }
        for month in &self.monthly_series {
            month.validate()?;
        }
        for item in &self.inventory {
            item.validate()?;
        }
        for invoice in &self.invoices {
            invoice.validate()?;
        }
        Ok(())
    }
}

impl ErpDataSource for SeedData {
    fn financial_summary(&self) -> Result<Option<FinancialSummary>> {
        Ok(self.financial_summary)
    }

    fn monthly_series(&self) -> Result<Vec<MonthlyFinancial>> {
        Ok(self.monthly_series.clone())
    }

    fn inventory_snapshot(&self) -> Result<InventorySnapshot> {
        Ok(InventorySnapshot::from_items(&self.inventory))
    }

    fn invoice_snapshot(&self) -> Result<InvoiceSnapshot> {
        Ok(InvoiceSnapshot::from_invoices(&self.invoices))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPOSITORY
// ═══════════════════════════════════════════════════════════════════════════════

/// Typed ERP records over any storage backend
pub struct ErpRepository<B: StorageBackend> {
    store: TypedStore<B>,
    // serializes read-modify-write of the month sequence
    month_lock: Mutex<()>,
}

impl<B: StorageBackend> ErpRepository<B> {
    /// Create repository over a backend
    pub fn new(backend: B) -> Self {
        Self {
            store: TypedStore::new(backend),
            month_lock: Mutex::new(()),
        }
    }

    /// Replace the current financial summary
    pub fn set_financial_summary(&self, summary: &FinancialSummary) -> Result<()> {
        summary.validate()?;
        self.store.set(&make_key(prefixes::FINANCIAL, CURRENT_SUMMARY), summary)
    }

    /// Remove the current financial summary
    pub fn clear_financial_summary(&self) -> Result<bool> {
        self.store
            .backend()
            .delete(&make_key(prefixes::FINANCIAL, CURRENT_SUMMARY))
    }

    /// Append a month to the end of the series
    pub fn push_month(&self, month: &MonthlyFinancial) -> Result<u64> {
        month.validate()?;
        let _guard = self.month_lock.lock().map_err(|_| Error::Lock)?;

        let next = match self.store.backend().list_prefix(prefixes::MONTH)?.last() {
            Some(key) => month_sequence(key)? + 1,
            None => 0,
        };
        self.store.set(&month_key(next), month)?;
        Ok(next)
    }

    /// Insert or replace an inventory item by id
    pub fn upsert_item(&self, item: &InventoryItem) -> Result<()> {
        item.validate()?;
        self.store.set(&make_key(prefixes::INVENTORY, item.id.as_bytes()), item)
    }

    /// Insert or replace an invoice by id
    pub fn upsert_invoice(&self, invoice: &Invoice) -> Result<()> {
        invoice.validate()?;
        self.store.set(&make_key(prefixes::INVOICE, invoice.id.as_bytes()), invoice)
    }

    /// All inventory items, ordered by id
    pub fn inventory_items(&self) -> Result<Vec<InventoryItem>> {
        self.store.values_with_prefix(prefixes::INVENTORY)
    }

    /// All invoices, ordered by id
    pub fn invoices(&self) -> Result<Vec<Invoice>> {
        self.store.values_with_prefix(prefixes::INVOICE)
    }

    /// Replace all stored records with a seed document
    pub fn load_seed(&self, seed: &SeedData) -> Result<()> {
        seed.validate()?;
        self.store.backend().clear()?;

        if let Some(summary) = &seed.financial_summary {
            self.set_financial_summary(summary)?;
        }
        for month in &seed.monthly_series {
            self.push_month(month)?;
        }
        for item in &seed.inventory {
            self.upsert_item(item)?;
        }
        for invoice in &seed.invoices {
            self.upsert_invoice(invoice)?;
        }
        self.store.backend().flush()?;

        info!(
            has_summary = seed.financial_summary.is_some(),
            months = seed.monthly_series.len(),
            items = seed.inventory.len(),
            invoices = seed.invoices.len(),
            "Loaded seed data"
        );
        Ok(())
    }

    /// Flush pending writes
    pub fn flush(&self) -> Result<()> {
        self.store.backend().flush()
    }
}

impl<B: StorageBackend> ErpDataSource for ErpRepository<B> {
    fn financial_summary(&self) -> Result<Option<FinancialSummary>> {
        self.store.get(&make_key(prefixes::FINANCIAL, CURRENT_SUMMARY))
    }

    fn monthly_series(&self) -> Result<Vec<MonthlyFinancial>> {
        self.store.values_with_prefix(prefixes::MONTH)
    }

    fn inventory_snapshot(&self) -> Result<InventorySnapshot> {
        Ok(InventorySnapshot::from_items(&self.inventory_items()?))
    }

    fn invoice_snapshot(&self) -> Result<InvoiceSnapshot> {
        Ok(InvoiceSnapshot::from_invoices(&self.invoices()?))
    }
}

fn month_key(sequence: u64) -> Vec<u8> {
    // zero padding keeps byte order equal to insertion order
    make_key(prefixes::MONTH, format!("{:020}", sequence).as_bytes())
}

fn month_sequence(key: &[u8]) -> Result<u64> {
    std::str::from_utf8(&key[prefixes::MONTH.len()..])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Storage("Malformed month key".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::InvoiceStatus;
    use crate::storage::backend::InMemoryStore;

    fn repo() -> ErpRepository<InMemoryStore> {
        ErpRepository::new(InMemoryStore::new())
    }

    #[test]
    fn test_summary_round_trip() {
        let repo = repo();
        assert_eq!(repo.financial_summary().unwrap(), None);

        let summary = FinancialSummary::new(24_500.0, 16_300.0, 8_200.0);
        repo.set_financial_summary(&summary).unwrap();
        assert_eq!(repo.financial_summary().unwrap(), Some(summary));

        assert!(repo.clear_financial_summary().unwrap());
        assert_eq!(repo.financial_summary().unwrap(), None);
    }

    #[test]
    fn test_months_keep_insertion_order() {
        let repo = repo();
        for (i, label) in ["Dec", "Jan", "Feb"].iter().enumerate() {
            let seq = repo.push_month(&MonthlyFinancial::new(*label, 100.0, 50.0)).unwrap();
            assert_eq!(seq, i as u64);
        }
        let labels: Vec<String> = repo.monthly_series().unwrap().into_iter().map(|m| m.month).collect();
        assert_eq!(labels, vec!["Dec", "Jan", "Feb"]);
    }

    #[test]
    fn test_many_months_stay_ordered() {
        let repo = repo();
        for i in 0..12 {
            repo.push_month(&MonthlyFinancial::new(format!("m{}", i), i as f64, 0.0)).unwrap();
        }
        let revenues: Vec<f64> = repo.monthly_series().unwrap().iter().map(|m| m.revenue).collect();
        assert_eq!(revenues, (0..12).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_snapshots() {
        let repo = repo();
        repo.upsert_item(&InventoryItem::new("a", "Paper", 1, 5)).unwrap();
        repo.upsert_item(&InventoryItem::new("b", "Toner", 10, 5)).unwrap();
        // replaces "a"
        repo.upsert_item(&InventoryItem::new("a", "Paper", 20, 5)).unwrap();
        repo.upsert_invoice(&Invoice::new("1", "Acme", 10.0, InvoiceStatus::Overdue)).unwrap();
        repo.upsert_invoice(&Invoice::new("2", "Acme", 10.0, InvoiceStatus::Paid)).unwrap();

        assert_eq!(repo.inventory_snapshot().unwrap(), InventorySnapshot::new(2, 0));
        assert_eq!(repo.invoice_snapshot().unwrap(), InvoiceSnapshot::new(2, 1));
    }

    #[test]
    fn test_rejects_invalid_records() {
        let repo = repo();
        assert!(repo.upsert_item(&InventoryItem::new("", "Nameless", 1, 1)).is_err());
        assert!(repo
            .set_financial_summary(&FinancialSummary::new(f64::NAN, 0.0, 0.0))
            .is_err());
    }

    #[test]
    fn test_load_seed_replaces_data() {
        let repo = repo();
        repo.upsert_item(&InventoryItem::new("old", "Old", 1, 1)).unwrap();

        let seed = SeedData::from_json(
            r#"{
                "financialSummary": {"revenue": 24500, "expenses": 16300, "profit": 8200},
                "monthlySeries": [
                    {"month": "2024-05", "revenue": 24800, "expenses": 16000, "profit": 8800},
                    {"month": "2024-06", "revenue": 24500, "expenses": 16300, "profit": 8200}
                ],
                "inventory": [
                    {"id": "1", "name": "Widget", "quantity": 2, "reorderLevel": 5}
                ],
                "invoices": []
            }"#,
        )
        .unwrap();
        repo.load_seed(&seed).unwrap();

        assert_eq!(repo.inventory_items().unwrap().len(), 1);
        assert_eq!(repo.monthly_series().unwrap().len(), 2);
        assert_eq!(repo.inventory_snapshot().unwrap(), InventorySnapshot::new(1, 1));
    }

    #[test]
    fn test_seed_rejects_invalid_json() {
        assert!(matches!(SeedData::from_json("{"), Err(Error::Deserialization(_))));
        assert!(matches!(
            SeedData::from_json(r#"{"monthlySeries":[{"month":"","revenue":1,"expenses":1,"profit":0}]}"#),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
