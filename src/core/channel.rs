//! Message passing between protocol parties.
//!
//! One channel carries both halves of a BB84 session:
//! - the qubit link, on which every registered eavesdropper measures and
//!   re-prepares each passing sequence, and
//! - the public classical discussion used for basis reconciliation, which
//!   observers can read but never disturb.
//!
//! Delivery is ordered and exactly-once per recipient: each party owns a
//! FIFO mailbox, [`QuantumChannel::send`] appends to it and the `recv_*`
//! calls pop the head.

use crate::core::eavesdrop::Eavesdropper;
use crate::core::errors::ChannelError;
use crate::core::polarization::{Basis, Polarization};
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Identifies a protocol participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartyId {
    Sender,
    Receiver,
    /// A registered observer, numbered in registration order.
    Eavesdropper(usize),
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyId::Sender => write!(f, "sender"),
            PartyId::Receiver => write!(f, "receiver"),
            PartyId::Eavesdropper(n) => write!(f, "eavesdropper {n}"),
        }
    }
}

/// A message in transit between two parties.
#[derive(Clone, Debug, PartialEq)]
pub enum ProtocolMessage {
    /// A sequence of polarized qubits (the quantum link).
    QubitTransfer(Vec<Polarization>),
    /// A sequence of bases (public classical discussion).
    BasisExchange(Vec<Basis>),
}

/// Message link between protocol parties, with optional passive observers.
#[derive(Debug, Default)]
pub struct QuantumChannel {
    mailboxes: HashMap<PartyId, VecDeque<ProtocolMessage>>,
    observers: Vec<Eavesdropper>,
}

impl QuantumChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an intercept-and-resend observer on the qubit link.
    ///
    /// Observers act in registration order on every subsequent qubit
    /// transfer sent by another party. Returns the id the observer answers
    /// to from now on.
    pub fn register_observer(&mut self, eavesdropper: Eavesdropper) -> PartyId {
        self.observers.push(eavesdropper);
        PartyId::Eavesdropper(self.observers.len() - 1)
    }

    /// Observers registered so far, in interception order.
    pub fn observers(&self) -> &[Eavesdropper] {
        &self.observers
    }

    /// Sends a message from `from` to `to`.
    ///
    /// A qubit transfer passes through every registered observer except the
    /// emitting one, each measuring in fresh random bases and re-preparing
    /// the sequence, so the recipient always receives the last re-prepared
    /// version. Basis exchanges arrive undisturbed.
    pub fn send<R: Rng + ?Sized>(
        &mut self,
        from: PartyId,
        to: PartyId,
        message: ProtocolMessage,
        rng: &mut R,
    ) {
        let delivered = match message {
            ProtocolMessage::QubitTransfer(mut symbols) => {
                for (i, observer) in self.observers.iter_mut().enumerate() {
                    if PartyId::Eavesdropper(i) == from {
                        continue;
                    }
                    let (_, resent) = observer.intercept_and_resend(&symbols, rng);
                    symbols = resent;
                    tracing::debug!(
                        observer = %PartyId::Eavesdropper(i),
                        len = symbols.len(),
                        "qubit transfer intercepted"
                    );
                }
                ProtocolMessage::QubitTransfer(symbols)
            }
            classical => classical,
        };

        tracing::debug!(%from, %to, "message delivered");
        self.mailboxes.entry(to).or_default().push_back(delivered);
    }

    /// Pops the next message for `to`, expecting a qubit transfer.
    ///
    /// A head-of-queue message of the wrong kind is left in place.
    pub fn recv_qubits(&mut self, to: PartyId) -> Result<Vec<Polarization>, ChannelError> {
        match self.pop(to)? {
            ProtocolMessage::QubitTransfer(symbols) => Ok(symbols),
            other => {
                self.push_front(to, other);
                Err(ChannelError::UnexpectedMessage {
                    expected: "qubit transfer",
                })
            }
        }
    }

    /// Pops the next message for `to`, expecting a basis exchange.
    ///
    /// A head-of-queue message of the wrong kind is left in place.
    pub fn recv_bases(&mut self, to: PartyId) -> Result<Vec<Basis>, ChannelError> {
        match self.pop(to)? {
            ProtocolMessage::BasisExchange(bases) => Ok(bases),
            other => {
                self.push_front(to, other);
                Err(ChannelError::UnexpectedMessage {
                    expected: "basis exchange",
                })
            }
        }
    }

    fn pop(&mut self, to: PartyId) -> Result<ProtocolMessage, ChannelError> {
        self.mailboxes
            .get_mut(&to)
            .and_then(VecDeque::pop_front)
            .ok_or(ChannelError::NoPendingMessage(to))
    }

    fn push_front(&mut self, to: PartyId, message: ProtocolMessage) {
        self.mailboxes.entry(to).or_default().push_front(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn delivery_is_fifo_and_exactly_once() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut channel = QuantumChannel::new();

        let first = vec![Basis::Rectilinear, Basis::Diagonal];
        let second = vec![Basis::Diagonal];

        channel.send(
            PartyId::Sender,
            PartyId::Receiver,
            ProtocolMessage::BasisExchange(first.clone()),
            &mut rng,
        );
        channel.send(
            PartyId::Sender,
            PartyId::Receiver,
            ProtocolMessage::BasisExchange(second.clone()),
            &mut rng,
        );

        assert_eq!(channel.recv_bases(PartyId::Receiver).unwrap(), first);
        assert_eq!(channel.recv_bases(PartyId::Receiver).unwrap(), second);
        assert!(matches!(
            channel.recv_bases(PartyId::Receiver),
            Err(ChannelError::NoPendingMessage(PartyId::Receiver))
        ));
    }

    #[test]
    fn party_ids_render_in_errors() {
        let err = ChannelError::NoPendingMessage(PartyId::Eavesdropper(1));
        assert_eq!(err.to_string(), "No pending message for eavesdropper 1");
    }

    #[test]
    fn mailboxes_are_per_recipient() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut channel = QuantumChannel::new();

        channel.send(
            PartyId::Sender,
            PartyId::Receiver,
            ProtocolMessage::BasisExchange(vec![Basis::Diagonal]),
            &mut rng,
        );

        assert!(matches!(
            channel.recv_bases(PartyId::Sender),
            Err(ChannelError::NoPendingMessage(PartyId::Sender))
        ));
        assert!(channel.recv_bases(PartyId::Receiver).is_ok());
    }

    #[test]
    fn wrong_kind_at_the_head_is_not_lost() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut channel = QuantumChannel::new();

        channel.send(
            PartyId::Sender,
            PartyId::Receiver,
            ProtocolMessage::QubitTransfer(vec![Polarization::Horizontal]),
            &mut rng,
        );

        assert!(matches!(
            channel.recv_bases(PartyId::Receiver),
            Err(ChannelError::UnexpectedMessage { .. })
        ));
        assert_eq!(
            channel.recv_qubits(PartyId::Receiver).unwrap(),
            vec![Polarization::Horizontal]
        );
    }

    #[test]
    fn observers_disturb_qubits_but_not_basis_exchange() {
        let mut rng = StdRng::seed_from_u64(34);
        let mut channel = QuantumChannel::new();
        channel.register_observer(Eavesdropper::new());

        let sent: Vec<Polarization> = (0..64)
            .map(|i| Polarization::encode(i % 2 == 0, Basis::Rectilinear))
            .collect();
        channel.send(
            PartyId::Sender,
            PartyId::Receiver,
            ProtocolMessage::QubitTransfer(sent.clone()),
            &mut rng,
        );

        let delivered = channel.recv_qubits(PartyId::Receiver).unwrap();
        assert_eq!(delivered.len(), sent.len());
        // The delivered sequence is the observer's re-preparation.
        for (i, symbol) in delivered.iter().enumerate() {
            assert_eq!(symbol.basis(), channel.observers()[0].bases()[i]);
        }

        let bases = vec![Basis::Rectilinear, Basis::Diagonal];
        channel.send(
            PartyId::Sender,
            PartyId::Receiver,
            ProtocolMessage::BasisExchange(bases.clone()),
            &mut rng,
        );
        assert_eq!(channel.recv_bases(PartyId::Receiver).unwrap(), bases);
    }

    #[test]
    fn observers_skip_their_own_sends() {
        let mut rng = StdRng::seed_from_u64(35);
        let mut channel = QuantumChannel::new();
        let eve = channel.register_observer(Eavesdropper::new());

        let sent = vec![Polarization::Diagonal, Polarization::Vertical];
        channel.send(
            eve,
            PartyId::Receiver,
            ProtocolMessage::QubitTransfer(sent.clone()),
            &mut rng,
        );

        assert_eq!(channel.recv_qubits(PartyId::Receiver).unwrap(), sent);
        assert!(channel.observers()[0].bases().is_empty());
    }

    #[test]
    fn multiple_observers_intercept_in_registration_order() {
        let mut rng = StdRng::seed_from_u64(36);
        let mut channel = QuantumChannel::new();
        channel.register_observer(Eavesdropper::new());
        channel.register_observer(Eavesdropper::new());

        let sent: Vec<Polarization> = (0..32)
            .map(|i| Polarization::encode(i % 2 == 0, Basis::Diagonal))
            .collect();
        channel.send(
            PartyId::Sender,
            PartyId::Receiver,
            ProtocolMessage::QubitTransfer(sent),
            &mut rng,
        );

        let delivered = channel.recv_qubits(PartyId::Receiver).unwrap();
        assert_eq!(channel.observers()[0].bases().len(), 32);
        assert_eq!(channel.observers()[1].bases().len(), 32);
        // The second observer re-prepared last, so delivery matches its bases.
        for (i, symbol) in delivered.iter().enumerate() {
            assert_eq!(symbol.basis(), channel.observers()[1].bases()[i]);
        }
    }
}
