//! Core domain models
//!
//! - `design`: normalized design tree, frames and detected elements
//! - `critique`: canonical critique produced from untrusted model output
//! - `ledger`: designs, versions and frame evaluations with the repository contract

pub mod critique;
pub mod design;
pub mod ledger;

pub use critique::*;
pub use design::*;
pub use ledger::*;
