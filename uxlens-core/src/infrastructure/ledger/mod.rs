//! Ledger repository implementations

pub mod memory;
pub mod postgres;

pub use memory::InMemoryLedgerRepository;
pub use postgres::SqlxLedgerRepository;
