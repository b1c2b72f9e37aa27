//! Infrastructure Layer - External concerns and implementations

pub mod ledger;

pub use ledger::{InMemoryLedgerRepository, SqlxLedgerRepository};
