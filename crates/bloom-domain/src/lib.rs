//! Domain types shared across Bloom services.
//!
//! Pure types with no framework dependencies.

pub mod client;
pub mod pagination;
