//! Data models

pub mod detection;
pub mod analysis;

pub use detection::*;
pub use analysis::*;
