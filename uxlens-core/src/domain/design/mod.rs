//! Design document domain

pub mod elements;
pub mod frame;
pub mod geometry;
pub mod tree;

pub use elements::*;
pub use frame::*;
pub use geometry::*;
pub use tree::*;
