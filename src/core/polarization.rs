//! Polarization encoding of classical bits.
//!
//! BB84 prepares each bit in one of two conjugate polarization bases:
//! - **Rectilinear (`+`)**: bit 0 as `→` (0°), bit 1 as `↑` (90°).
//! - **Diagonal (`x`)**: bit 0 as `↗` (45°), bit 1 as `↖` (135°).
//!
//! Measuring in the preparation basis recovers the bit exactly; measuring
//! in the conjugate basis yields a uniformly random bit. That asymmetry is
//! the whole security argument of the protocol.

use rand::Rng;
use std::fmt;

/// Polarization basis used to prepare or measure a qubit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Rectilinear (`+`): horizontal/vertical polarization.
    Rectilinear,
    /// Diagonal (`x`): 45°/135° polarization.
    Diagonal,
}

impl Basis {
    /// Stable 0/1 code for serializing basis announcements.
    pub fn index(self) -> u8 {
        match self {
            Basis::Rectilinear => 0,
            Basis::Diagonal => 1,
        }
    }

    /// Inverse of [`Basis::index`].
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Basis::Rectilinear),
            1 => Some(Basis::Diagonal),
            _ => None,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Rectilinear => write!(f, "+"),
            Basis::Diagonal => write!(f, "x"),
        }
    }
}

/// One of the four photon polarization states the protocol transmits.
///
/// The alphabet is closed: every (bit, basis) pair maps to exactly one
/// symbol and [`Polarization::decode`] inverts the mapping exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Polarization {
    /// `→` 0°, bit 0 in the rectilinear basis.
    Horizontal,
    /// `↑` 90°, bit 1 in the rectilinear basis.
    Vertical,
    /// `↗` 45°, bit 0 in the diagonal basis.
    Diagonal,
    /// `↖` 135°, bit 1 in the diagonal basis.
    Antidiagonal,
}

impl Polarization {
    /// Encodes a classical bit in the given basis.
    pub fn encode(bit: bool, basis: Basis) -> Self {
        match (basis, bit) {
            (Basis::Rectilinear, false) => Polarization::Horizontal,
            (Basis::Rectilinear, true) => Polarization::Vertical,
            (Basis::Diagonal, false) => Polarization::Diagonal,
            (Basis::Diagonal, true) => Polarization::Antidiagonal,
        }
    }

    /// Recovers the (basis, bit) pair this symbol encodes.
    pub fn decode(self) -> (Basis, bool) {
        match self {
            Polarization::Horizontal => (Basis::Rectilinear, false),
            Polarization::Vertical => (Basis::Rectilinear, true),
            Polarization::Diagonal => (Basis::Diagonal, false),
            Polarization::Antidiagonal => (Basis::Diagonal, true),
        }
    }

    /// The basis this symbol was prepared in.
    pub fn basis(self) -> Basis {
        self.decode().0
    }

    /// The bit this symbol encodes in its own basis.
    pub fn bit(self) -> bool {
        self.decode().1
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self {
            Polarization::Horizontal => "→",
            Polarization::Vertical => "↑",
            Polarization::Diagonal => "↗",
            Polarization::Antidiagonal => "↖",
        };
        write!(f, "{arrow}")
    }
}

/// Draws `len` independent uniform random bits.
pub fn random_bits<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<bool> {
    (0..len).map(|_| rng.random_bool(0.5)).collect()
}

/// Draws `len` independent uniform random bases.
pub fn random_bases<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<Basis> {
    (0..len)
        .map(|_| {
            if rng.random_bool(0.5) {
                Basis::Diagonal
            } else {
                Basis::Rectilinear
            }
        })
        .collect()
}
