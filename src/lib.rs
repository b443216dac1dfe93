//! Classical simulation of the BB84 quantum key distribution protocol.
//!
//! A sender and receiver establish a shared secret over a channel that may
//! be passively observed: bits are polarization-encoded in random bases,
//! measured in random bases on arrival, sifted down to the basis-agreement
//! positions, and checked for the error-rate fingerprint an
//! intercept-and-resend attacker cannot avoid leaving. A clean run derives
//! a session key that drives an AES-128-CBC message cipher; a compromised
//! run withholds the key.
//!
//! ```
//! use polarq::{Bb84Config, MessageCipher, protocols::qkd::bb84};
//!
//! # fn main() -> Result<(), polarq::errors::ProtocolError> {
//! let record = bb84::run(&Bb84Config::new(256))?;
//! assert!(!record.compromised);
//!
//! let cipher = MessageCipher::from_record(&record);
//! assert!(cipher.has_key());
//! # Ok(())
//! # }
//! ```

mod cipher;
mod core;
mod key;
pub mod protocols;

pub use crate::cipher::MessageCipher;
pub use crate::core::{
    Basis, Eavesdropper, PartyId, Polarization, ProtocolMessage, QuantumChannel, errors, measure,
    random_bases, random_bits,
};
pub use crate::key::{SESSION_KEY_BITS, SessionKey, derive_key};
pub use crate::protocols::qkd::bb84::{Bb84Config, EavesdropperRecord, TransmissionRecord};
