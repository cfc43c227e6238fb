//! Configuration module for Bizdesk
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::BizdeskPaths;
pub use settings::{EmptySectionPolicy, ExportSettings, Settings};
