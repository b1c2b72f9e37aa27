//! Analysis domain layer
//!
//! - Errors raised by normalization and detection
//! - Value objects: analysis settings and the injected theme keyword set

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
