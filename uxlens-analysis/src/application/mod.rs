//! Analysis application layer

pub mod use_cases;
