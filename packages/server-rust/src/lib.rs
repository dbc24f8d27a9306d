//! Abacus Server — HTTP façade over the exact-arithmetic module group.

pub mod network;

pub use network::{NetworkConfig, NetworkModule};
