//! Reports module for Bizdesk
//!
//! Provides the per-business metrics summary.

pub mod metrics;

pub use metrics::{BusinessMetrics, FinancialMetrics, InventoryMetrics, RecentIncome};
