//! BB84 Quantum Key Distribution Protocol.
//!
//! BB84, proposed by Bennett and Brassard in 1984, lets two parties grow a
//! shared secret from a stream of polarized qubits plus a public classical
//! discussion. Its security rests on measurement disturbance: an attacker
//! who intercepts and re-sends the qubits guesses the wrong basis half the
//! time and thereby imprints a ~25% error rate on the sifted key, which the
//! QBER check exposes.
//!
//! One call to [`run`] executes a complete session: qubit preparation and
//! transfer, measurement, the two-round basis discussion, sifting, QBER
//! estimation with the abort decision, and session-key derivation. Every
//! run owns its parties, channel, and [`TransmissionRecord`]; nothing is
//! shared between runs.

use crate::protocols::qkd::reconciliation::{self, DEFAULT_QBER_THRESHOLD};
use crate::{
    Basis, Eavesdropper, PartyId, Polarization, ProtocolMessage, QuantumChannel, SessionKey,
    errors::ProtocolError, measure, random_bases, random_bits,
};
use rand::Rng;

/// Parameters of a single protocol run.
#[derive(Clone, Debug)]
pub struct Bb84Config {
    /// Number of qubits transmitted (the raw key length).
    pub key_length: usize,
    /// Error rate above which the run aborts as compromised.
    pub qber_threshold: f64,
    /// Whether [`run`] registers an intercept-and-resend eavesdropper.
    pub eavesdropper: bool,
}

impl Default for Bb84Config {
    fn default() -> Self {
        Self {
            key_length: 128,
            qber_threshold: DEFAULT_QBER_THRESHOLD,
            eavesdropper: false,
        }
    }
}

impl Bb84Config {
    pub fn new(key_length: usize) -> Self {
        Self {
            key_length,
            ..Self::default()
        }
    }

    /// Sets the abort threshold for the QBER check.
    pub fn with_qber_threshold(mut self, threshold: f64) -> Self {
        self.qber_threshold = threshold;
        self
    }

    /// Adds or removes the eavesdropper [`run`] registers on its channel.
    pub fn with_eavesdropper(mut self, present: bool) -> Self {
        self.eavesdropper = present;
        self
    }
}

/// The sending party. Owns its raw bits and preparation bases.
pub struct Sender {
    bits: Vec<bool>,
    bases: Vec<Basis>,
}

impl Sender {
    /// Draws `len` fresh random bits and bases.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self {
            bits: random_bits(len, rng),
            bases: random_bases(len, rng),
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn bases(&self) -> &[Basis] {
        &self.bases
    }

    /// Encodes every bit in its basis, producing the transmit sequence.
    pub fn polarize(&self) -> Vec<Polarization> {
        self.bits
            .iter()
            .zip(&self.bases)
            .map(|(&bit, &basis)| Polarization::encode(bit, basis))
            .collect()
    }

    /// Sifts the sender-side key once the peer's bases are known.
    pub fn sifted_key(
        &self,
        peer_bases: &[Basis],
    ) -> Result<(Vec<usize>, Vec<bool>), ProtocolError> {
        reconciliation::sift(&self.bases, peer_bases, &self.bits)
    }
}

/// The receiving party. Owns its measurement bases and records outcomes.
pub struct Receiver {
    bases: Vec<Basis>,
    outcomes: Vec<Polarization>,
    bits: Vec<bool>,
}

impl Receiver {
    /// Draws `len` fresh random measurement bases.
    pub fn with_random_bases<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self {
            bases: random_bases(len, rng),
            outcomes: Vec::new(),
            bits: Vec::new(),
        }
    }

    pub fn bases(&self) -> &[Basis] {
        &self.bases
    }

    /// Bits decoded from the most recent [`Receiver::measure_sequence`].
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Symbols observed in the most recent [`Receiver::measure_sequence`].
    pub fn outcomes(&self) -> &[Polarization] {
        &self.outcomes
    }

    /// Measures an incoming sequence position by position in the prepared
    /// bases, recording both the observed symbols and their bits.
    pub fn measure_sequence<R: Rng + ?Sized>(
        &mut self,
        symbols: &[Polarization],
        rng: &mut R,
    ) -> Result<(), ProtocolError> {
        if symbols.len() != self.bases.len() {
            return Err(ProtocolError::LengthMismatch {
                left: symbols.len(),
                right: self.bases.len(),
            });
        }

        self.outcomes = symbols
            .iter()
            .zip(&self.bases)
            .map(|(&symbol, &basis)| measure(symbol, basis, rng))
            .collect();
        self.bits = self.outcomes.iter().map(|symbol| symbol.bit()).collect();

        Ok(())
    }

    /// Sifts the receiver-side key once the peer's bases are known.
    pub fn sifted_key(
        &self,
        peer_bases: &[Basis],
    ) -> Result<(Vec<usize>, Vec<bool>), ProtocolError> {
        reconciliation::sift(peer_bases, &self.bases, &self.bits)
    }
}

/// What one registered eavesdropper learned during a run.
pub struct EavesdropperRecord {
    /// Random measurement bases the attacker drew.
    pub bases: Vec<Basis>,
    /// Bits the attacker measured and re-sent.
    pub measured_bits: Vec<bool>,
}

/// Complete, immutable outcome of one protocol run.
pub struct TransmissionRecord {
    /// Number of qubits transmitted.
    pub raw_length: usize,
    /// Number of basis-agreement positions.
    pub sifted_length: usize,
    /// Bit mismatches among the agreement positions.
    pub errors: usize,
    /// Observed quantum bit error rate, as a fraction of the sifted key.
    pub qber: f64,
    /// True when the QBER exceeded the configured threshold.
    pub compromised: bool,
    /// Alice's raw bits.
    pub alice_bits: Vec<bool>,
    /// Alice's preparation bases.
    pub alice_bases: Vec<Basis>,
    /// Bob's measurement bases.
    pub bob_bases: Vec<Basis>,
    /// Bits Bob measured, position-aligned with Alice's.
    pub bob_results: Vec<bool>,
    /// Interception logs, one per registered eavesdropper.
    pub eavesdroppers: Vec<EavesdropperRecord>,
    /// Agreement positions, ascending.
    pub sifted_indices: Vec<usize>,
    /// Alice's bits at the agreement positions.
    pub sifted_key: Vec<bool>,
    /// Established key. `None` when the run was compromised or produced no
    /// sifted material; a detected eavesdropper never yields a usable key.
    pub session_key: Option<SessionKey>,
}

/// Runs one complete BB84 session on a fresh channel.
///
/// Registers a single eavesdropper when the config asks for one. Use
/// [`run_with_channel`] to manage the channel, and any number of
/// observers, yourself.
pub fn run(config: &Bb84Config) -> Result<TransmissionRecord, ProtocolError> {
    let mut channel = QuantumChannel::new();

    if config.eavesdropper {
        channel.register_observer(Eavesdropper::new());
    }

    run_with_channel(config, &mut channel)
}

/// Runs one complete BB84 session over a caller-supplied channel.
pub fn run_with_channel(
    config: &Bb84Config,
    channel: &mut QuantumChannel,
) -> Result<TransmissionRecord, ProtocolError> {
    if config.key_length == 0 {
        return Err(ProtocolError::InvalidKeyLength(0));
    }

    let mut rng = rand::rng();

    tracing::debug!(
        key_length = config.key_length,
        qber_threshold = config.qber_threshold,
        observers = channel.observers().len(),
        "starting BB84 run"
    );

    // 1. Preparation: Alice draws bits and bases, Bob draws bases
    let alice = Sender::random(config.key_length, &mut rng);
    let mut bob = Receiver::with_random_bases(config.key_length, &mut rng);

    // 2. Qubit transfer: registered observers intercept and re-send in flight
    channel.send(
        PartyId::Sender,
        PartyId::Receiver,
        ProtocolMessage::QubitTransfer(alice.polarize()),
        &mut rng,
    );

    // 3. Measurement
    let arriving = channel.recv_qubits(PartyId::Receiver)?;
    bob.measure_sequence(&arriving, &mut rng)?;

    // 4. Basis discussion: the only two classical rounds of the protocol
    channel.send(
        PartyId::Sender,
        PartyId::Receiver,
        ProtocolMessage::BasisExchange(alice.bases().to_vec()),
        &mut rng,
    );
    channel.send(
        PartyId::Receiver,
        PartyId::Sender,
        ProtocolMessage::BasisExchange(bob.bases().to_vec()),
        &mut rng,
    );

    let bob_announced = channel.recv_bases(PartyId::Sender)?;
    let alice_announced = channel.recv_bases(PartyId::Receiver)?;

    // 5. Sifting: each side keeps its own bits at the agreement positions
    let (sifted_indices, sifted_key) = alice.sifted_key(&bob_announced)?;
    let (_, bob_sifted) = bob.sifted_key(&alice_announced)?;

    // 6. QBER estimation over the whole sifted key
    let agree_mask: Vec<bool> = alice
        .bases()
        .iter()
        .zip(&bob_announced)
        .map(|(a, b)| a == b)
        .collect();
    let qber = reconciliation::estimate_qber(alice.bits(), bob.bits(), &agree_mask)?;
    let errors = sifted_key
        .iter()
        .zip(&bob_sifted)
        .filter(|(alice_bit, bob_bit)| alice_bit != bob_bit)
        .count();

    // 7. Abort decision and key derivation
    let compromised = reconciliation::detect(qber, config.qber_threshold);

    if compromised {
        tracing::warn!(
            qber,
            threshold = config.qber_threshold,
            "error rate above threshold, withholding session key"
        );
    } else {
        tracing::debug!(
            qber,
            sifted_length = sifted_key.len(),
            secure_rate = reconciliation::secure_key_rate(qber),
            "run completed clean"
        );
    }

    let session_key = if compromised || sifted_key.is_empty() {
        None
    } else {
        Some(SessionKey::derive(&sifted_key))
    };

    let eavesdroppers = channel
        .observers()
        .iter()
        .map(|observer| EavesdropperRecord {
            bases: observer.bases().to_vec(),
            measured_bits: observer.measured_bits().to_vec(),
        })
        .collect();

    let Sender {
        bits: alice_bits,
        bases: alice_bases,
    } = alice;
    let Receiver {
        bases: bob_bases,
        bits: bob_results,
        ..
    } = bob;

    Ok(TransmissionRecord {
        raw_length: config.key_length,
        sifted_length: sifted_key.len(),
        errors,
        qber,
        compromised,
        alice_bits,
        alice_bases,
        bob_bases,
        bob_results,
        eavesdroppers,
        sifted_indices,
        sifted_key,
        session_key,
    })
}
