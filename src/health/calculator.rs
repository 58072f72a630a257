//! Financial Health Score calculation.
//!
//! Five fixed metrics add up to a score out of 100:
//!
//! | Metric              | Max | Ratio                          |
//! |---------------------|-----|--------------------------------|
//! | profit margin       | 30  | profit / revenue               |
//! | revenue growth      | 20  | (last - previous) / previous   |
//! | expense management  | 15  | expenses / revenue             |
//! | inventory health    | 15  | 1 - low stock / items          |
//! | accounts receivable | 20  | overdue / invoices             |
//!
//! Every zero denominator has a defined fallback and overflowing ratios
//! saturate, so the calculation never fails and never yields a non-finite
//! number.

use std::collections::BTreeMap;

use super::report::{HealthCategory, HealthMetric, HealthReport, MetricScore};
use crate::core::records::{FinancialSummary, MonthlyFinancial};
use crate::core::snapshot::{InventorySnapshot, InvoiceSnapshot};

/// Compute the health report for the given aggregates.
///
/// Pure and deterministic: identical inputs always produce an identical
/// report. The monthly series is read in the order supplied; its last two
/// entries are taken as the two most recent months.
pub fn compute_health_report(
    financial: &FinancialSummary,
    series: &[MonthlyFinancial],
    inventory: &InventorySnapshot,
    invoices: &InvoiceSnapshot,
) -> HealthReport {
    let entries = [
        (HealthMetric::ProfitMargin, profit_margin(financial)),
        (HealthMetric::RevenueGrowth, revenue_growth(series)),
        (HealthMetric::ExpenseManagement, expense_management(financial)),
        (HealthMetric::InventoryHealth, inventory_health(inventory)),
        (HealthMetric::AccountsReceivable, accounts_receivable(invoices)),
    ];

    let score: u8 = entries.iter().map(|(_, m)| m.score).sum();
    let category = HealthCategory::from_score(score);

    HealthReport {
        score,
        category,
        metrics: entries.into_iter().collect::<BTreeMap<_, _>>(),
        recommendations: category
            .recommendations()
            .iter()
            .map(|r| r.to_string())
            .collect(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// METRICS
// ═══════════════════════════════════════════════════════════════════════════════

/// Profit margin: `profit / revenue`, 1 point per percent up to 30
pub fn profit_margin(financial: &FinancialSummary) -> MetricScore {
    let ratio = safe_ratio(financial.profit, financial.revenue);
    metric(HealthMetric::ProfitMargin, ratio, ratio * 100.0)
}

/// Revenue growth between the last two months, 1 point per percent up to 20
pub fn revenue_growth(series: &[MonthlyFinancial]) -> MetricScore {
    let ratio = match series {
        [.., previous, last] => safe_ratio(last.revenue - previous.revenue, previous.revenue),
        _ => 0.0,
    };
    metric(HealthMetric::RevenueGrowth, ratio, ratio * 100.0)
}

/// Expense management: `15 * (1 - expenses / revenue)`
///
/// With no revenue the expense ratio is taken as 0, which scores full marks.
pub fn expense_management(financial: &FinancialSummary) -> MetricScore {
    let ratio = safe_ratio(financial.expenses, financial.revenue);
    metric(HealthMetric::ExpenseManagement, ratio, 15.0 * (1.0 - ratio))
}

/// Inventory health: `15 * (1 - low_stock / total)`, full marks with no items
pub fn inventory_health(inventory: &InventorySnapshot) -> MetricScore {
    let ratio = if inventory.total_item_count == 0 {
        1.0
    } else {
        1.0 - inventory.low_stock_item_count as f64 / inventory.total_item_count as f64
    };
    metric(HealthMetric::InventoryHealth, ratio, 15.0 * ratio)
}

/// Accounts receivable: `20 * (1 - overdue / total)`, full marks with no invoices
///
/// The reported value is the overdue ratio.
pub fn accounts_receivable(invoices: &InvoiceSnapshot) -> MetricScore {
    if invoices.total_invoice_count == 0 {
        return metric(HealthMetric::AccountsReceivable, 0.0, 20.0);
    }
    let ratio = invoices.overdue_invoice_count as f64 / invoices.total_invoice_count as f64;
    metric(HealthMetric::AccountsReceivable, ratio, 20.0 * (1.0 - ratio))
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn metric(kind: HealthMetric, ratio: f64, raw_points: f64) -> MetricScore {
    let max_score = kind.max_score();
    MetricScore {
        score: clamp_points(round_half_up(raw_points), max_score),
        value: saturate(ratio),
        max_score,
    }
}

/// `numerator / denominator`, or 0 for a zero denominator or NaN.
///
/// An overflowing quotient saturates to `±f64::MAX`, so it still lands on
/// the matching end of the score range.
fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    saturate(numerator / denominator)
}

fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(f64::MIN, f64::MAX)
}

/// Round to nearest integer, halves toward positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn clamp_points(points: f64, max_score: u8) -> u8 {
    if points.is_nan() {
        return 0;
    }
    points.clamp(0.0, f64::from(max_score)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(label: &str, revenue: f64) -> MonthlyFinancial {
        MonthlyFinancial::new(label, revenue, 0.0)
    }

    #[test]
    fn test_reference_scenario() {
        let financial = FinancialSummary::new(24_500.0, 16_300.0, 8_200.0);
        let series = vec![month("2024-05", 24_800.0), month("2024-06", 24_500.0)];
        let report = compute_health_report(
            &financial,
            &series,
            &InventorySnapshot::new(5, 2),
            &InvoiceSnapshot::new(3, 0),
        );

        assert_eq!(report.metrics[&HealthMetric::ProfitMargin].score, 30);
        assert_eq!(report.metrics[&HealthMetric::RevenueGrowth].score, 0);
        assert_eq!(report.metrics[&HealthMetric::ExpenseManagement].score, 5);
        assert_eq!(report.metrics[&HealthMetric::InventoryHealth].score, 9);
        assert_eq!(report.metrics[&HealthMetric::AccountsReceivable].score, 20);
        assert_eq!(report.score, 64);
        assert_eq!(report.category, HealthCategory::Good);
        assert!(report.verify().is_ok());
    }

    #[test]
    fn test_profit_margin_clamps() {
        assert_eq!(profit_margin(&FinancialSummary::new(100.0, 0.0, 45.0)).score, 30);
        assert_eq!(profit_margin(&FinancialSummary::new(100.0, 0.0, 12.0)).score, 12);
        assert_eq!(profit_margin(&FinancialSummary::new(100.0, 150.0, -50.0)).score, 0);
    }

    #[test]
    fn test_profit_margin_zero_revenue() {
        let m = profit_margin(&FinancialSummary::new(0.0, 0.0, 0.0));
        assert_eq!(m.score, 0);
        assert_eq!(m.value, 0.0);
    }

    #[test]
    fn test_revenue_growth_needs_two_months() {
        assert_eq!(revenue_growth(&[]).score, 0);
        let single = revenue_growth(&[month("Jan", 1_000.0)]);
        assert_eq!(single.score, 0);
        assert_eq!(single.value, 0.0);
    }

    #[test]
    fn test_revenue_growth_uses_last_two_by_position() {
        let series = vec![
            month("Mar", 100.0),
            month("Jan", 1_000.0),
            month("Feb", 1_100.0),
        ];
        let m = revenue_growth(&series);
        assert_eq!(m.score, 10);
        assert!((m.value - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_growth_clamps() {
        assert_eq!(revenue_growth(&[month("a", 100.0), month("b", 200.0)]).score, 20);
        assert_eq!(revenue_growth(&[month("a", 200.0), month("b", 100.0)]).score, 0);
    }

    #[test]
    fn test_revenue_growth_zero_previous() {
        let m = revenue_growth(&[month("a", 0.0), month("b", 500.0)]);
        assert_eq!(m.score, 0);
        assert_eq!(m.value, 0.0);
    }

    #[test]
    fn test_expense_management() {
        assert_eq!(expense_management(&FinancialSummary::new(100.0, 0.0, 100.0)).score, 15);
        assert_eq!(expense_management(&FinancialSummary::new(100.0, 50.0, 50.0)).score, 8);
        assert_eq!(expense_management(&FinancialSummary::new(100.0, 200.0, -100.0)).score, 0);
    }

    #[test]
    fn test_expense_management_zero_revenue() {
        let m = expense_management(&FinancialSummary::new(0.0, 500.0, -500.0));
        assert_eq!(m.score, 15);
        assert_eq!(m.value, 0.0);
    }

    #[test]
    fn test_inventory_health() {
        assert_eq!(inventory_health(&InventorySnapshot::new(0, 0)).score, 15);
        assert_eq!(inventory_health(&InventorySnapshot::new(0, 0)).value, 1.0);
        assert_eq!(inventory_health(&InventorySnapshot::new(4, 4)).score, 0);
        assert_eq!(inventory_health(&InventorySnapshot::new(10, 2)).score, 12);
    }

    #[test]
    fn test_inventory_health_inconsistent_counts() {
        // more low-stock items than items
        assert_eq!(inventory_health(&InventorySnapshot::new(2, 5)).score, 0);
    }

    #[test]
    fn test_accounts_receivable() {
        let none = accounts_receivable(&InvoiceSnapshot::new(0, 0));
        assert_eq!(none.score, 20);
        assert_eq!(none.value, 0.0);

        assert_eq!(accounts_receivable(&InvoiceSnapshot::new(4, 1)).score, 15);
        assert_eq!(accounts_receivable(&InvoiceSnapshot::new(4, 4)).score, 0);
    }

    #[test]
    fn test_zero_everything_is_finite() {
        let report = compute_health_report(
            &FinancialSummary::new(0.0, 0.0, 0.0),
            &[],
            &InventorySnapshot::default(),
            &InvoiceSnapshot::default(),
        );
        assert!(report.metrics.values().all(|m| m.value.is_finite()));
        // 0 + 0 + 15 + 15 + 20
        assert_eq!(report.score, 50);
        assert_eq!(report.category, HealthCategory::Fair);
        assert!(report.verify().is_ok());
    }

    #[test]
    fn test_overflowing_ratios_saturate() {
        let overspent = expense_management(&FinancialSummary::new(1e-320, 1e300, 0.0));
        assert_eq!(overspent.score, 0);
        assert_eq!(overspent.value, f64::MAX);

        let windfall = profit_margin(&FinancialSummary::new(1e-320, 0.0, 1e300));
        assert_eq!(windfall.score, 30);
        assert_eq!(windfall.value, f64::MAX);

        let wipeout = profit_margin(&FinancialSummary::new(1e-320, 0.0, -1e300));
        assert_eq!(wipeout.score, 0);
        assert_eq!(wipeout.value, f64::MIN);

        let surge = revenue_growth(&[month("a", 1e-320), month("b", 1e300)]);
        assert_eq!(surge.score, 20);
        assert_eq!(surge.value, f64::MAX);
    }

    #[test]
    fn test_nan_ratio_falls_back_to_zero() {
        let m = profit_margin(&FinancialSummary::new(f64::INFINITY, 0.0, f64::INFINITY));
        assert_eq!(m.score, 0);
        assert_eq!(m.value, 0.0);
    }

    #[test]
    fn test_saturated_report_stays_consistent() {
        let report = compute_health_report(
            &FinancialSummary::new(1e-320, 1e300, -1e300),
            &[month("a", 1e-320), month("b", 1e300)],
            &InventorySnapshot::new(3, 1),
            &InvoiceSnapshot::new(2, 0),
        );
        // 0 + 20 + 0 + 10 + 20
        assert_eq!(report.score, 50);
        assert!(report.verify().is_ok());
        assert!(serde_json::to_string(&report).is_ok());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-1.21), -1.0);
        assert_eq!(round_half_up(5.02), 5.0);
    }

    #[test]
    fn test_recommendations_follow_category() {
        let report = compute_health_report(
            &FinancialSummary::new(1_000.0, 0.0, 1_000.0),
            &[month("a", 100.0), month("b", 150.0)],
            &InventorySnapshot::new(10, 0),
            &InvoiceSnapshot::new(10, 0),
        );
        assert_eq!(report.score, 100);
        assert_eq!(report.category, HealthCategory::Excellent);
        assert_eq!(report.recommendations[0], "Consider expansion opportunities");
    }
}
