// SPDX-License-Identifier: MIT OR Apache-2.0

//! The capability contract every backend implements.
//!
//! Callers drive all key lifecycle and signing operations through these
//! traits; the concrete backend behind them is never named. Every operation
//! comes in two forms backed by one implementation: a `try_` method returning
//! the error kind, and a panicking counterpart without the prefix for callers
//! that treat failure as fatal.
use std::fmt;
use std::sync::Arc;

use crate::buffer::{Buffer, Bytes};
use crate::error::{
    ConvertError, ExportError, GenerateError, ImportError, SignError, VerifyError,
};
use crate::jwk::{SigningKeyJwk, VerifyingKeyJwk};

pub const SIGNING_KEY_SIZE: usize = 32;
pub const VERIFYING_KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

/// Private Ed25519 key held by one backend.
///
/// Whether the key lives as plain bytes, an opaque engine handle or foreign
/// memory is the backend's business; dropping the key releases whatever it
/// holds exactly once.
pub trait SigningKey: Send + Sync {
    /// Derives the verifying half of the key.
    fn try_verifying_key(&self) -> Result<Box<dyn VerifyingKey>, ConvertError>;

    /// Signs the payload.
    fn try_sign(&self, payload: Bytes<'_>) -> Result<Box<dyn Signature>, SignError>;

    /// Raw 32-byte seed. Fails for keys created non-extractable.
    fn try_export(&self) -> Result<Buffer, ExportError>;

    /// JWK record carrying both the private scalar and the public point.
    /// Fails for keys created non-extractable.
    fn try_export_jwk(&self) -> Result<SigningKeyJwk, ExportError>;

    /// # Panics
    ///
    /// Panics where [`SigningKey::try_verifying_key`] returns an error.
    fn verifying_key(&self) -> Box<dyn VerifyingKey> {
        self.try_verifying_key().unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`SigningKey::try_sign`] returns an error.
    fn sign(&self, payload: Bytes<'_>) -> Box<dyn Signature> {
        self.try_sign(payload).unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`SigningKey::try_export`] returns an error.
    fn export(&self) -> Buffer {
        self.try_export().unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`SigningKey::try_export_jwk`] returns an error.
    fn export_jwk(&self) -> SigningKeyJwk {
        self.try_export_jwk().unwrap_or_else(|err| panic!("{err}"))
    }
}

/// Public Ed25519 key held by one backend.
pub trait VerifyingKey: Send + Sync + fmt::Debug {
    /// Checks the signature over the payload.
    ///
    /// A cryptographically invalid signature is `Ok(false)`, never an error;
    /// `Err` means verification could not be attempted (structural fault).
    /// The signature may come from any backend: its bytes are read through
    /// the [`Signature`] contract.
    fn try_verify(
        &self,
        payload: Bytes<'_>,
        signature: &dyn Signature,
    ) -> Result<bool, VerifyError>;

    /// Raw 32-byte compressed point. Fails for keys imported non-extractable.
    fn try_export(&self) -> Result<Buffer, ExportError>;

    /// JWK record carrying the public point. Fails for keys imported
    /// non-extractable.
    fn try_export_jwk(&self) -> Result<VerifyingKeyJwk, ExportError>;

    /// # Panics
    ///
    /// Panics where [`VerifyingKey::try_verify`] returns an error.
    fn verify(&self, payload: Bytes<'_>, signature: &dyn Signature) -> bool {
        self.try_verify(payload, signature)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`VerifyingKey::try_export`] returns an error.
    fn export(&self) -> Buffer {
        self.try_export().unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`VerifyingKey::try_export_jwk`] returns an error.
    fn export_jwk(&self) -> VerifyingKeyJwk {
        self.try_export_jwk().unwrap_or_else(|err| panic!("{err}"))
    }
}

/// Detached Ed25519 signature, immutable once created.
pub trait Signature: Send + Sync + fmt::Debug {
    /// The 64 signature bytes.
    fn try_export(&self) -> Result<Buffer, ExportError>;

    /// # Panics
    ///
    /// Panics where [`Signature::try_export`] returns an error.
    fn export(&self) -> Buffer {
        self.try_export().unwrap_or_else(|err| panic!("{err}"))
    }
}

pub trait SigningKeyFactory: Send + Sync {
    /// Generates a fresh key pair.
    fn try_random(&self, extractable: bool) -> Result<Box<dyn SigningKey>, GenerateError>;

    /// Imports a 32-byte seed. The bytes are copied or adopted during the
    /// call; the key never aliases caller memory afterwards.
    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError>;

    /// Imports a JWK record, validating its fixed fields, lengths and the
    /// consistency of the private/public pair.
    fn try_import_jwk(
        &self,
        jwk: &SigningKeyJwk,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError>;

    /// # Panics
    ///
    /// Panics where [`SigningKeyFactory::try_random`] returns an error.
    fn random(&self, extractable: bool) -> Box<dyn SigningKey> {
        self.try_random(extractable)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`SigningKeyFactory::try_import`] returns an error.
    fn import(&self, bytes: Bytes<'_>, extractable: bool) -> Box<dyn SigningKey> {
        self.try_import(bytes, extractable)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`SigningKeyFactory::try_import_jwk`] returns an error.
    fn import_jwk(&self, jwk: &SigningKeyJwk, extractable: bool) -> Box<dyn SigningKey> {
        self.try_import_jwk(jwk, extractable)
            .unwrap_or_else(|err| panic!("{err}"))
    }
}

pub trait VerifyingKeyFactory: Send + Sync {
    /// Imports a 32-byte compressed point.
    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError>;

    /// Imports a JWK record, validating its fixed fields and length.
    fn try_import_jwk(
        &self,
        jwk: &VerifyingKeyJwk,
        extractable: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError>;

    /// # Panics
    ///
    /// Panics where [`VerifyingKeyFactory::try_import`] returns an error.
    fn import(&self, bytes: Bytes<'_>, extractable: bool) -> Box<dyn VerifyingKey> {
        self.try_import(bytes, extractable)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics where [`VerifyingKeyFactory::try_import_jwk`] returns an error.
    fn import_jwk(&self, jwk: &VerifyingKeyJwk, extractable: bool) -> Box<dyn VerifyingKey> {
        self.try_import_jwk(jwk, extractable)
            .unwrap_or_else(|err| panic!("{err}"))
    }
}

pub trait SignatureFactory: Send + Sync {
    /// Imports 64 signature bytes.
    fn try_import(&self, bytes: Bytes<'_>) -> Result<Box<dyn Signature>, ImportError>;

    /// # Panics
    ///
    /// Panics where [`SignatureFactory::try_import`] returns an error.
    fn import(&self, bytes: Bytes<'_>) -> Box<dyn Signature> {
        self.try_import(bytes).unwrap_or_else(|err| panic!("{err}"))
    }
}

/// One backend's three factories bundled for hand-off.
///
/// Cheap to clone; clones share the factories.
#[derive(Clone)]
pub struct Adapter {
    name: &'static str,
    signing_key: Arc<dyn SigningKeyFactory>,
    verifying_key: Arc<dyn VerifyingKeyFactory>,
    signature: Arc<dyn SignatureFactory>,
}

impl Adapter {
    pub fn new(
        name: &'static str,
        signing_key: Arc<dyn SigningKeyFactory>,
        verifying_key: Arc<dyn VerifyingKeyFactory>,
        signature: Arc<dyn SignatureFactory>,
    ) -> Self {
        Self {
            name,
            signing_key,
            verifying_key,
            signature,
        }
    }

    /// Diagnostic name of the backend behind this adapter.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signing_key(&self) -> &dyn SigningKeyFactory {
        self.signing_key.as_ref()
    }

    pub fn verifying_key(&self) -> &dyn VerifyingKeyFactory {
        self.verifying_key.as_ref()
    }

    pub fn signature(&self) -> &dyn SignatureFactory {
        self.signature.as_ref()
    }

    /// Cheap support probe: generates one disposable non-extractable key and
    /// discards it. Any failure is absorbed into `false`.
    pub fn probe(&self) -> bool {
        match self.signing_key.try_random(false) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(backend = self.name, %err, "ed25519 backend probe failed");
                false
            }
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter").field("name", &self.name).finish()
    }
}
