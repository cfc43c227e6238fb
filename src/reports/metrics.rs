//! Business metrics
//!
//! Income, expense and inventory figures for one business, as served by
//! `GET /api/businesses/{id}/metrics` and printed by `bizdesk business metrics`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Business, BusinessId, Expense, Income, IncomeId, Money, Product};
use crate::services::income::last_seven_days_start;

/// Identity of the business the metrics describe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBusiness {
    pub id: BusinessId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Number of records owned by the business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsCounts {
    pub products: usize,
    pub incomes: usize,
    pub expenses: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub total_income: Money,
    pub total_expense: Money,
    pub profit: Money,
    /// profit / total income × 100; 0 without income
    pub profit_margin: f64,
    #[serde(rename = "last7DaysIncome")]
    pub last_7_days_income: Money,
    /// total income / total expense; 0 without expenses
    pub cost_benefit_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    pub total_products: usize,
    /// Σ stock × cost
    pub inventory_value: Money,
    /// Σ stock × price
    pub inventory_retail_value: Money,
    pub potential_profit: Money,
    pub low_stock_products: usize,
}

/// One income inside the trailing seven-day window
#[derive(Debug, Clone, Serialize)]
pub struct RecentIncome {
    pub id: IncomeId,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
}

/// Metrics summary for a business
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
    pub business: MetricsBusiness,
    pub counts: MetricsCounts,
    pub financial: FinancialMetrics,
    pub inventory: InventoryMetrics,
    #[serde(rename = "last7DaysIncomes")]
    pub last_7_days_incomes: Vec<RecentIncome>,
}

impl BusinessMetrics {
    /// Compute the metrics from the records owned by `business`
    ///
    /// `incomes` are expected newest first; the recent-income list keeps
    /// their order.
    pub fn compute(
        business: &Business,
        products: &[Product],
        incomes: &[Income],
        expenses: &[Expense],
        today: NaiveDate,
    ) -> Self {
        let total_income: Money = incomes.iter().map(|i| i.amount).sum();
        let total_expense: Money = expenses.iter().map(|e| e.amount).sum();
        let profit = total_income - total_expense;

        let window_start = last_seven_days_start(today);
        let last_7_days_incomes: Vec<RecentIncome> = incomes
            .iter()
            .filter(|i| i.date >= window_start)
            .map(|i| RecentIncome {
                id: i.id,
                description: i.description.clone(),
                amount: i.amount,
                date: i.date,
            })
            .collect();
        let last_7_days_income = last_7_days_incomes.iter().map(|i| i.amount).sum();

        let inventory_value: Money = products.iter().map(Product::inventory_value).sum();
        let inventory_retail_value: Money = products.iter().map(Product::retail_value).sum();

        Self {
            business: MetricsBusiness {
                id: business.id,
                name: business.name.clone(),
                created_at: business.created_at,
            },
            counts: MetricsCounts {
                products: products.len(),
                incomes: incomes.len(),
                expenses: expenses.len(),
            },
            financial: FinancialMetrics {
                total_income,
                total_expense,
                profit,
                profit_margin: ratio(profit, total_income) * 100.0,
                last_7_days_income,
                cost_benefit_ratio: ratio(total_income, total_expense),
            },
            inventory: InventoryMetrics {
                total_products: products.len(),
                inventory_value,
                inventory_retail_value,
                potential_profit: inventory_retail_value - inventory_value,
                low_stock_products: products.iter().filter(|p| p.is_low_stock()).count(),
            },
            last_7_days_incomes,
        }
    }

    /// Format the metrics for terminal display
    pub fn format_terminal(&self) -> String {
        let financial = &self.financial;
        let inventory = &self.inventory;
        let mut output = String::new();

        output.push_str(&format!("Metrics: {}\n", self.business.name));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        output.push_str(&format!(
            "Records:           {} products, {} incomes, {} expenses\n\n",
            self.counts.products, self.counts.incomes, self.counts.expenses
        ));

        output.push_str(&format!("Total Income:      {:>15}\n", financial.total_income));
        output.push_str(&format!("Total Expense:     {:>15}\n", financial.total_expense));
        output.push_str(&"-".repeat(35));
        output.push('\n');
        output.push_str(&format!("Profit:            {:>15}\n", financial.profit));
        output.push_str(&format!(
            "Profit Margin:     {:>14.2}%\n",
            financial.profit_margin
        ));
        output.push_str(&format!(
            "Cost/Benefit:      {:>15.2}\n",
            financial.cost_benefit_ratio
        ));
        output.push_str(&format!(
            "Last 7 Days:       {:>15}\n\n",
            financial.last_7_days_income
        ));

        output.push_str(&format!("Inventory Value:   {:>15}\n", inventory.inventory_value));
        output.push_str(&format!(
            "Retail Value:      {:>15}\n",
            inventory.inventory_retail_value
        ));
        output.push_str(&format!("Potential Profit:  {:>15}\n", inventory.potential_profit));
        output.push_str(&format!(
            "Low Stock:         {:>15}\n",
            inventory.low_stock_products
        ));

        if !self.last_7_days_incomes.is_empty() {
            output.push('\n');
            output.push_str(&format!("{:<12} {:<30} {:>12}\n", "Date", "Description", "Amount"));
            output.push_str(&"-".repeat(56));
            output.push('\n');
            for income in &self.last_7_days_incomes {
                output.push_str(&format!(
                    "{:<12} {:<30} {:>12}\n",
                    income.date.format("%Y-%m-%d"),
                    truncate(&income.description, 30),
                    income.amount
                ));
            }
        }

        output
    }
}

fn ratio(numerator: Money, denominator: Money) -> f64 {
    if denominator.is_zero() {
        0.0
    } else {
        numerator.cents() as f64 / denominator.cents() as f64
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn product(business: &Business, price: i64, cost: i64, stock: u32, min_stock: u32) -> Product {
        let mut product = Product::new(
            business.id,
            "Cable",
            Money::from_cents(price),
            Money::from_cents(cost),
        );
        product.stock = stock;
        product.min_stock = min_stock;
        product
    }

    #[test]
    fn test_empty_business_has_zero_ratios() {
        let business = Business::new("Servicell");
        let metrics = BusinessMetrics::compute(&business, &[], &[], &[], day(20));

        assert_eq!(metrics.financial.profit, Money::zero());
        assert_eq!(metrics.financial.profit_margin, 0.0);
        assert_eq!(metrics.financial.cost_benefit_ratio, 0.0);
        assert_eq!(metrics.inventory.total_products, 0);
        assert!(metrics.last_7_days_incomes.is_empty());
    }

    #[test]
    fn test_financial_figures() {
        let business = Business::new("Servicell");
        let incomes = vec![
            Income::new(business.id, "Reparación", Money::from_cents(30000), day(20)),
            Income::new(business.id, "Venta", Money::from_cents(10000), day(13)),
            Income::new(business.id, "Antigua", Money::from_cents(10000), day(12)),
        ];
        let expenses = vec![Expense::new(business.id, "Alquiler", Money::from_cents(25000), day(1))];

        let metrics = BusinessMetrics::compute(&business, &[], &incomes, &expenses, day(20));
        let financial = &metrics.financial;

        assert_eq!(financial.total_income, Money::from_cents(50000));
        assert_eq!(financial.total_expense, Money::from_cents(25000));
        assert_eq!(financial.profit, Money::from_cents(25000));
        assert_eq!(financial.profit_margin, 50.0);
        assert_eq!(financial.cost_benefit_ratio, 2.0);

        // day 13 is exactly seven days back and still counts
        assert_eq!(financial.last_7_days_income, Money::from_cents(40000));
        let recent: Vec<&str> = metrics
            .last_7_days_incomes
            .iter()
            .map(|i| i.description.as_str())
            .collect();
        assert_eq!(recent, vec!["Reparación", "Venta"]);
    }

    #[test]
    fn test_inventory_figures() {
        let business = Business::new("Servicell");
        let products = vec![
            product(&business, 1000, 600, 5, 2),
            product(&business, 2000, 1500, 1, 1),
            product(&business, 500, 100, 0, 0),
        ];

        let metrics = BusinessMetrics::compute(&business, &products, &[], &[], day(20));
        let inventory = &metrics.inventory;

        assert_eq!(inventory.total_products, 3);
        assert_eq!(inventory.inventory_value, Money::from_cents(4500));
        assert_eq!(inventory.inventory_retail_value, Money::from_cents(7000));
        assert_eq!(inventory.potential_profit, Money::from_cents(2500));
        assert_eq!(inventory.low_stock_products, 2);
    }

    #[test]
    fn test_maximal_values_saturate() {
        let business = Business::new("Servicell");
        let products = vec![
            product(&business, Money::MAX.cents(), 100, u32::MAX, 0),
            product(&business, Money::MAX.cents(), 100, u32::MAX, 0),
        ];
        let incomes = vec![
            Income::new(business.id, "Venta", Money::MAX, day(20)),
            Income::new(business.id, "Venta", Money::MAX, day(20)),
        ];

        let metrics = BusinessMetrics::compute(&business, &products, &incomes, &[], day(20));

        assert_eq!(metrics.inventory.inventory_retail_value.cents(), i64::MAX);
        assert!(metrics.inventory.potential_profit.cents() > 0);
        assert_eq!(metrics.financial.total_income.cents(), 2 * Money::MAX.cents());
        assert!(!metrics.format_terminal().is_empty());
        assert!(serde_json::to_value(&metrics).is_ok());
    }

    #[test]
    fn test_json_shape() {
        let business = Business::new("Servicell");
        let incomes = vec![Income::new(business.id, "Venta", Money::from_cents(550), day(20))];

        let metrics = BusinessMetrics::compute(&business, &[], &incomes, &[], day(20));
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["business"]["name"], "Servicell");
        assert!(json["business"]["createdAt"].is_string());
        assert_eq!(json["counts"]["incomes"], 1);
        assert_eq!(json["financial"]["totalIncome"], 5.5);
        assert_eq!(json["financial"]["last7DaysIncome"], 5.5);
        assert_eq!(json["financial"]["costBenefitRatio"], 0.0);
        assert_eq!(json["inventory"]["lowStockProducts"], 0);
        assert_eq!(json["last7DaysIncomes"][0]["date"], "2025-03-20");
        assert_eq!(json["last7DaysIncomes"][0]["amount"], 5.5);
    }

    #[test]
    fn test_format_terminal() {
        let business = Business::new("Servicell");
        let incomes = vec![Income::new(business.id, "Venta", Money::from_cents(1250), day(20))];

        let metrics = BusinessMetrics::compute(&business, &[], &incomes, &[], day(20));
        let output = metrics.format_terminal();

        assert!(output.contains("Metrics: Servicell"));
        assert!(output.contains("12.50"));
        assert!(output.contains("2025-03-20"));
    }
}
