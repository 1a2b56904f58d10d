//! TLS certificate pinning.
//!
//! [`PinningValidator`] reimplements a chain-of-trust decision using only
//! locally held certificates: given the peer's presented chain and the
//! outcome of the connection's baseline (default-CA) trust evaluation, it
//! decides whether the peer's public key matches a pinned certificate set.
//! Evaluation is synchronous and stateless; independent connections may
//! validate concurrently without coordination.

mod evaluate;

use base64::prelude::*;
use bon::Builder;
use bytes::Bytes;

pub use evaluate::{BasicTrustEvaluator, PublicKey, TrustEvaluator, TrustVerdict};

/// Which certificate in the peer chain the pin is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinningMode {
    /// Pin against the last certificate of the presented chain.
    Root,
    /// Pin against the peer's leaf certificate.
    Leaf,
}

/// The pinned certificate set.
///
/// Certificates are base64-encoded DER. Entries that fail to decode or
/// parse are skipped during validation, not treated as configuration
/// errors. Owned by whoever configures the transport and lives for the
/// lifetime of that configuration.
#[derive(Debug, Clone, Builder)]
pub struct PinningConfig {
    /// Base64-encoded DER certificates, in match order.
    pub certificates: Vec<String>,
    /// Which chain position is pinned.
    pub mode: PinningMode,
}

/// A server-trust challenge: what the peer presented, and how the baseline
/// default-CA evaluation of the connection judged it.
#[derive(Debug, Clone, Builder)]
pub struct ServerTrust {
    /// The hostname the connection was made to.
    #[builder(into)]
    host: String,
    /// The peer's DER certificate chain, leaf first.
    peer_certificates: Vec<Bytes>,
    /// The baseline trust verdict for the whole connection.
    baseline: TrustVerdict,
}

impl ServerTrust {
    /// The hostname the connection was made to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The peer's DER certificate chain, leaf first.
    #[must_use]
    pub fn peer_certificates(&self) -> &[Bytes] {
        &self.peer_certificates
    }

    /// The baseline trust verdict.
    #[must_use]
    pub fn baseline(&self) -> TrustVerdict {
        self.baseline
    }
}

/// An accepted peer identity, handed back to the transport as the
/// credential for the challenge.
#[derive(Debug, Clone)]
pub struct TrustCredential {
    certificates: Vec<Bytes>,
}

impl TrustCredential {
    pub(crate) fn for_trust(trust: &ServerTrust) -> Self {
        Self {
            certificates: trust.peer_certificates().to_vec(),
        }
    }

    /// The accepted peer chain.
    #[must_use]
    pub fn certificates(&self) -> &[Bytes] {
        &self.certificates
    }
}

/// Evaluates server-trust challenges against a pinned certificate set.
pub struct PinningValidator<V: TrustEvaluator = BasicTrustEvaluator> {
    config: PinningConfig,
    evaluator: V,
}

impl PinningValidator {
    /// Creates a validator using the structural [`BasicTrustEvaluator`].
    #[must_use]
    pub fn new(config: PinningConfig) -> Self {
        Self {
            config,
            evaluator: BasicTrustEvaluator,
        }
    }
}

impl<V: TrustEvaluator> PinningValidator<V> {
    /// Creates a validator with a custom single-certificate evaluator.
    #[must_use]
    pub fn with_evaluator(config: PinningConfig, evaluator: V) -> Self {
        Self { config, evaluator }
    }

    /// Decides whether the challenge yields a usable credential.
    ///
    /// A baseline of [`TrustVerdict::Proceed`] or
    /// [`TrustVerdict::Unspecified`] (a chain the default trust store
    /// already approves) accepts **without consulting the pinned set**.
    /// This shortcut is carried over from the original design deliberately:
    /// it means pinning only constrains peers the default policies would
    /// reject, and does not narrow the set of already-trusted CAs. Callers
    /// relying on pinning as a hard allowlist should be aware of it.
    ///
    /// A fatal baseline rejects immediately. A recoverable baseline runs
    /// the pin match: the peer's candidate key (per [`PinningMode`]) is
    /// compared for exact equality against the key of each pinned
    /// certificate, skipping entries that fail to decode or parse. Any
    /// match accepts; exhausting the set rejects.
    #[must_use]
    pub fn credential(&self, trust: &ServerTrust) -> Option<TrustCredential> {
        match trust.baseline() {
            TrustVerdict::Fatal => None,
            TrustVerdict::Proceed | TrustVerdict::Unspecified => {
                Some(TrustCredential::for_trust(trust))
            }
            TrustVerdict::RecoverableFailure => self
                .validate_public_key(trust)
                .then(|| TrustCredential::for_trust(trust)),
        }
    }

    fn validate_public_key(&self, trust: &ServerTrust) -> bool {
        let Some(server_key) = self.peer_public_key(trust) else {
            return false;
        };

        for certificate in &self.config.certificates {
            let Ok(der) = BASE64_STANDARD.decode(certificate) else {
                continue;
            };
            let Some(local_key) = self.certificate_public_key(&der, trust.host()) else {
                continue;
            };
            if local_key == server_key {
                return true;
            }
        }

        false
    }

    /// Derives the peer's candidate key per the configured mode.
    fn peer_public_key(&self, trust: &ServerTrust) -> Option<PublicKey> {
        match self.config.mode {
            PinningMode::Leaf => {
                PublicKey::from_certificate_der(trust.peer_certificates().first()?)
            }
            PinningMode::Root => {
                let root = trust.peer_certificates().last()?;
                self.certificate_public_key(root, trust.host())
            }
        }
    }

    /// Re-evaluates one certificate against the host; a usable verdict
    /// yields its key.
    fn certificate_public_key(&self, certificate_der: &[u8], host: &str) -> Option<PublicKey> {
        match self.evaluator.evaluate(certificate_der, host) {
            TrustVerdict::Proceed
            | TrustVerdict::Unspecified
            | TrustVerdict::RecoverableFailure => {
                PublicKey::from_certificate_der(certificate_der)
            }
            TrustVerdict::Fatal => None,
        }
    }
}
