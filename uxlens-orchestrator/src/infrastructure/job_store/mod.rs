//! Evaluation job storage

mod store;

pub use store::{InMemoryJobStore, JobStore, JobStoreError};
