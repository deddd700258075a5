//! Core domain types and logic.

pub mod trade;
pub mod stock;
pub mod index;
pub mod summary;
pub mod market;
pub mod config_validation;
pub mod error;
