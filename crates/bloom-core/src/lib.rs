//! HTTP plumbing shared by Bloom services: health probes, request ids,
//! tracing setup and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
