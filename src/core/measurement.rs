//! Polarization measurement.

use crate::core::polarization::{Basis, Polarization};
use rand::Rng;

/// Measures a polarization symbol in the given basis.
///
/// When the measurement basis matches the preparation basis the symbol
/// passes through unchanged and the encoded bit is recovered exactly.
/// Otherwise the outcome is a uniformly random bit re-encoded in the
/// measurement basis; any correlation with the original bit is destroyed.
///
/// The caller keeps the outcome, nothing else changes hands.
pub fn measure<R: Rng + ?Sized>(symbol: Polarization, basis: Basis, rng: &mut R) -> Polarization {
    if symbol.basis() == basis {
        symbol
    } else {
        Polarization::encode(rng.random_bool(0.5), basis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ALL_SYMBOLS: [Polarization; 4] = [
        Polarization::Horizontal,
        Polarization::Vertical,
        Polarization::Diagonal,
        Polarization::Antidiagonal,
    ];

    #[test]
    fn matching_basis_returns_the_symbol_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        for symbol in ALL_SYMBOLS {
            assert_eq!(measure(symbol, symbol.basis(), &mut rng), symbol);
        }
    }

    #[test]
    fn mismatched_basis_reencodes_in_the_measurement_basis() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let out = measure(Polarization::Horizontal, Basis::Diagonal, &mut rng);
            assert_eq!(out.basis(), Basis::Diagonal);
            let out = measure(Polarization::Antidiagonal, Basis::Rectilinear, &mut rng);
            assert_eq!(out.basis(), Basis::Rectilinear);
        }
    }

    #[test]
    fn mismatched_basis_outcome_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let trials = 10_000;
        let mut ones = 0;
        for _ in 0..trials {
            if measure(Polarization::Vertical, Basis::Diagonal, &mut rng).bit() {
                ones += 1;
            }
        }
        assert!((4500..=5500).contains(&ones), "ones = {ones}");
    }
}
