//! Intercept-and-resend eavesdropping.
//!
//! The attacker modeled here measures every passing qubit in a freshly
//! drawn random basis and re-prepares what it measured. Half of those basis
//! guesses are wrong, and each wrong guess randomizes the bit the receiver
//! later measures at a basis-agreement position, so full interception
//! leaves a ~25% error rate in the sifted key. The QBER check is built to
//! catch exactly that fingerprint.

use crate::core::measurement::measure;
use crate::core::polarization::{self, Basis, Polarization};
use rand::Rng;

/// A passive intercept-and-resend attacker.
///
/// Keeps the basis and bit sequences of its most recent interception so a
/// completed run can record what the attacker learned.
#[derive(Debug, Default)]
pub struct Eavesdropper {
    bases: Vec<Basis>,
    measured_bits: Vec<bool>,
}

impl Eavesdropper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures each symbol in a fresh random basis and re-prepares it.
    ///
    /// Returns the measured bits and the re-prepared sequence that travels
    /// on to the receiver. Both preserve the input's length and order; the
    /// re-prepared symbols carry the attacker's bases, not the sender's.
    pub fn intercept_and_resend<R: Rng + ?Sized>(
        &mut self,
        symbols: &[Polarization],
        rng: &mut R,
    ) -> (Vec<bool>, Vec<Polarization>) {
        self.bases = polarization::random_bases(symbols.len(), rng);

        let mut measured_bits = Vec::with_capacity(symbols.len());
        let mut resent = Vec::with_capacity(symbols.len());

        for (&symbol, &basis) in symbols.iter().zip(&self.bases) {
            let outcome = measure(symbol, basis, rng);
            measured_bits.push(outcome.bit());
            resent.push(outcome);
        }

        self.measured_bits = measured_bits.clone();
        (measured_bits, resent)
    }

    /// Bases drawn during the most recent interception.
    pub fn bases(&self) -> &[Basis] {
        &self.bases
    }

    /// Bits measured during the most recent interception.
    pub fn measured_bits(&self) -> &[bool] {
        &self.measured_bits
    }
}
