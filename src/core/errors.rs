use crate::core::channel::PartyId;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    #[error("No pending message for {0}")]
    NoPendingMessage(PartyId),

    #[error("Unexpected message kind at the head of the queue: expected {expected}")]
    UnexpectedMessage { expected: &'static str },
}

#[derive(Error, Debug, Clone)]
pub enum ProtocolError {
    #[error("Sequence length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Key length must be at least 1, got {0}")]
    InvalidKeyLength(usize),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

#[derive(Error, Debug, Clone)]
pub enum CipherError {
    #[error("No session key available: the run was compromised or produced no key material")]
    NoKeyAvailable,

    #[error("Ciphertext length or padding is invalid")]
    InvalidPadding,
}
