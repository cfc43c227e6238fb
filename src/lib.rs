//! Bizdesk - inventory, income and expense tracking for small businesses
//!
//! This library provides the core functionality behind the `bizdesk` binary:
//! several businesses, each owning products, incomes and expenses, plus a
//! shared catalogue of product categories and brands. Everything is served
//! over a JSON HTTP API and can be exported as CSV with Spanish labels.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (businesses, products, incomes, ...)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business logic layer
//! - `reports`: Business metrics
//! - `export`: CSV export
//! - `api`: HTTP handlers and router
//! - `cli`, `display`: Command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use bizdesk::config::{BizdeskPaths, Settings};
//! use bizdesk::storage::Storage;
//!
//! let paths = BizdeskPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod log;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BizdeskError, BizdeskResult};
