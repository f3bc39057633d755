//! HTTP handlers

pub mod health;
pub mod index;
pub mod images;
pub mod summary;
pub mod analyze;
