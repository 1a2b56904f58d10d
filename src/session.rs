//! Session configuration and the trust-challenge contract.
//!
//! A [`SessionConfiguration`] is an explicitly constructed, immutable value
//! injected wherever a transport needs to answer server-trust challenges.
//! There is no process-wide shared instance; each transport owns the
//! configuration it was given.

use bon::Builder;

use crate::pinning::{
    BasicTrustEvaluator, PinningValidator, ServerTrust, TrustCredential, TrustEvaluator,
};

/// What the transport should do with a server-trust challenge.
#[derive(Debug, Clone)]
pub enum ChallengeDisposition {
    /// Proceed with this credential.
    UseCredential(TrustCredential),
    /// Let the platform's default handling decide.
    PerformDefaultHandling,
    /// Refuse the connection.
    CancelChallenge,
}

/// Immutable per-transport configuration.
///
/// With a pinning validator configured, every server-trust challenge is
/// answered by the validator: an accepted peer proceeds with its
/// credential, a rejected one cancels the challenge. Without pinning the
/// configuration is a pass-through: any presented chain is accepted as-is,
/// and a challenge with no chain falls back to default handling.
#[derive(Builder)]
pub struct SessionConfiguration<V: TrustEvaluator = BasicTrustEvaluator> {
    /// The pinning validator, if pinning is configured.
    pinning: Option<PinningValidator<V>>,
}

impl<V: TrustEvaluator> SessionConfiguration<V> {
    /// Answers one server-trust challenge.
    #[must_use]
    pub fn resolve_challenge(&self, trust: &ServerTrust) -> ChallengeDisposition {
        match &self.pinning {
            Some(validator) => match validator.credential(trust) {
                Some(credential) => ChallengeDisposition::UseCredential(credential),
                None => ChallengeDisposition::CancelChallenge,
            },
            None => {
                if trust.peer_certificates().is_empty() {
                    ChallengeDisposition::PerformDefaultHandling
                } else {
                    ChallengeDisposition::UseCredential(TrustCredential::for_trust(trust))
                }
            }
        }
    }
}
