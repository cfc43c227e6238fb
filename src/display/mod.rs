//! Display formatting for terminal output

pub mod business;

pub use business::format_business_list;
