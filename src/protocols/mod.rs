//! Quantum cryptography protocols.
//!
//! Currently quantum key distribution only; the [`qkd`] namespace leaves
//! room for authentication protocols later.

pub mod qkd;
pub use qkd::bb84;
