//! Transport kernel - HTTP and signing seams shared by every API adapter.
//!
//! The kernel contains no endpoint knowledge. `RestClient` is the unified
//! HTTP interface the adapters in [`crate::rest`] are built on, and `Signer`
//! is the pluggable authentication seam. Both are trait-based so adapters can
//! be exercised against mock transports in tests.

pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{KucoinSigner, SignatureResult, Signer};
