//! Single-certificate trust evaluation and public-key derivation.

use x509_parser::prelude::{FromDer as _, X509Certificate};

use crate::platform::MaybeSendSync;

/// The outcome of a trust evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustVerdict {
    /// Explicitly trusted (e.g. a user-approved exception).
    Proceed,
    /// Trusted under default policies with nothing further to say.
    Unspecified,
    /// The chain parses but is not anchored by default policies. This is
    /// the verdict that makes a certificate usable for pinning.
    RecoverableFailure,
    /// Fatally invalid; the certificate yields nothing.
    Fatal,
}

/// Evaluates a single certificate against a hostname.
///
/// This is the seam the validator uses both to qualify the peer's root
/// certificate and to derive keys from the pinned set. Implementations
/// backed by a real trust store can anchor against installed CAs; the
/// default [`BasicTrustEvaluator`] performs structural checks only.
pub trait TrustEvaluator: MaybeSendSync {
    /// Evaluates one DER-encoded certificate for `host`.
    fn evaluate(&self, certificate_der: &[u8], host: &str) -> TrustVerdict;
}

/// A structural evaluator with no trust-store anchoring.
///
/// Any well-formed certificate lands on
/// [`TrustVerdict::RecoverableFailure`] (parseable but unanchored), which
/// is exactly the verdict that permits key derivation during pinning.
/// Unparseable input is [`TrustVerdict::Fatal`]. The hostname is accepted
/// but not enforced: a pinned root CA certificate never names the peer's
/// host, and rejecting on that mismatch would make root-mode pinning
/// impossible.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTrustEvaluator;

impl TrustEvaluator for BasicTrustEvaluator {
    fn evaluate(&self, certificate_der: &[u8], _host: &str) -> TrustVerdict {
        match X509Certificate::from_der(certificate_der) {
            Ok(_) => TrustVerdict::RecoverableFailure,
            Err(_) => TrustVerdict::Fatal,
        }
    }
}

/// A certificate's public key, compared by exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    /// Extracts the subject public key from a DER-encoded certificate.
    #[must_use]
    pub fn from_certificate_der(certificate_der: &[u8]) -> Option<Self> {
        let (_, certificate) = X509Certificate::from_der(certificate_der).ok()?;
        Some(Self(
            certificate.public_key().subject_public_key.data.to_vec(),
        ))
    }

    /// The raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
