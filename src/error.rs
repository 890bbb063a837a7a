// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error kinds shared by every backend.
//!
//! Backends translate engine faults into exactly one of these kinds at the
//! point they cross the contract boundary; no engine error type escapes.
//! Callers branch on the kind, never on the backend behind it.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("could not gather randomness for key generation")]
    Randomness,

    #[error("engine rejected key generation: {0}")]
    Engine(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid key length {0}, expected {1} bytes")]
    InvalidKeyLength(usize, usize),

    #[error("invalid signature length {0}, expected {1} bytes")]
    InvalidSignatureLength(usize, usize),

    #[error("unexpected jwk curve \"{0}\", expected \"Ed25519\"")]
    UnexpectedCurve(String),

    #[error("unexpected jwk key type \"{0}\", expected \"OKP\"")]
    UnexpectedKeyType(String),

    #[error("malformed base64url in jwk field \"{0}\"")]
    MalformedBase64(&'static str),

    #[error("jwk public key does not match its private key")]
    PublicKeyMismatch,

    #[error("engine rejected key material: {0}")]
    Engine(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("key was created non-extractable")]
    NotExtractable,

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("engine rejected export: {0}")]
    Engine(String),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not derive verifying key: {0}")]
    Engine(String),
}

#[derive(Debug, Error)]
pub enum SignError {
    #[error("engine rejected signing: {0}")]
    Engine(String),
}

/// Structural verification faults.
///
/// A cryptographically invalid signature is not an error: `verify` reports it
/// as `Ok(false)`. This kind covers the cases where verification could not be
/// attempted at all.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid signature length {0}, expected {1} bytes")]
    InvalidSignatureLength(usize, usize),

    #[error("could not read signature: {0}")]
    Signature(#[from] ExportError),

    #[error("engine fault during verification: {0}")]
    Engine(String),
}

/// Failures of the process-wide adapter registry, distinct from the
/// per-operation kinds above.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no ed25519 adapter has been configured")]
    NotConfigured,

    #[error("adapter registry lock is poisoned")]
    Poisoned,
}
