//! Analysis engines

pub mod detector;
pub mod normalizer;
pub mod patterns;
pub mod scorer;
