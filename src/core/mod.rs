mod channel;
mod eavesdrop;
pub mod errors;
mod measurement;
mod polarization;

pub use channel::{PartyId, ProtocolMessage, QuantumChannel};
pub use eavesdrop::Eavesdropper;
pub use measurement::measure;
pub use polarization::{Basis, Polarization, random_bases, random_bits};
