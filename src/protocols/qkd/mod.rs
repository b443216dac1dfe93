//! Quantum Key Distribution (QKD) protocols.
//!
//! - **BB84**: prepare-and-measure key distribution over polarized qubits.
//!
//! [`reconciliation`] holds the classical post-processing every
//! prepare-and-measure protocol shares: sifting, QBER estimation, and the
//! abort decision.

pub mod bb84;
pub mod reconciliation;
