// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure-software backend over `ed25519-dalek`.
//!
//! Keys are plain 32-byte values and every operation is a synchronous
//! byte-in/byte-out call, so this backend works everywhere and is the last
//! resort of the fallback chain. Key and signature lengths are validated
//! eagerly at import; public points are validated at import as well (the
//! engine rejects bytes that do not decompress to a curve point).
use std::sync::{Arc, OnceLock};

use ed25519_dalek::{Signer, Verifier};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::buffer::{Buffer, Bytes};
use crate::contract::{
    Adapter, SIGNATURE_SIZE, SIGNING_KEY_SIZE, Signature, SignatureFactory, SigningKey,
    SigningKeyFactory, VERIFYING_KEY_SIZE, VerifyingKey, VerifyingKeyFactory,
};
use crate::error::{
    ConvertError, ExportError, GenerateError, ImportError, SignError, VerifyError,
};
use crate::jwk::{SigningKeyJwk, VerifyingKeyJwk};

const NAME: &str = "dalek";

/// Bundles the software backend's three factories.
pub fn adapter() -> Adapter {
    Adapter::new(
        NAME,
        Arc::new(DalekSigningKeyFactory),
        Arc::new(DalekVerifyingKeyFactory),
        Arc::new(DalekSignatureFactory),
    )
}

/// Whether the software engine is usable in this process.
///
/// Probed once by generating a disposable key; the result is memoized for
/// the process lifetime.
pub fn is_supported() -> bool {
    static SUPPORTED: OnceLock<bool> = OnceLock::new();
    *SUPPORTED.get_or_init(|| adapter().probe())
}

struct DalekSigningKey {
    key: ed25519_dalek::SigningKey,
    extractable: bool,
}

impl SigningKey for DalekSigningKey {
    fn try_verifying_key(&self) -> Result<Box<dyn VerifyingKey>, ConvertError> {
        Ok(Box::new(DalekVerifyingKey {
            key: self.key.verifying_key(),
            extractable: true,
        }))
    }

    fn try_sign(&self, payload: Bytes<'_>) -> Result<Box<dyn Signature>, SignError> {
        Ok(Box::new(DalekSignature(self.key.sign(payload.as_slice()))))
    }

    fn try_export(&self) -> Result<Buffer, ExportError> {
        if !self.extractable {
            return Err(ExportError::NotExtractable);
        }
        let mut seed = self.key.to_bytes();
        let buffer = Buffer::copy_from(&seed);
        seed.zeroize();
        Ok(buffer)
    }

    fn try_export_jwk(&self) -> Result<SigningKeyJwk, ExportError> {
        let seed = self.try_export()?;
        Ok(SigningKeyJwk::new(
            seed.as_slice(),
            self.key.verifying_key().as_bytes(),
        ))
    }
}

struct DalekVerifyingKey {
    key: ed25519_dalek::VerifyingKey,
    extractable: bool,
}

impl VerifyingKey for DalekVerifyingKey {
    fn try_verify(
        &self,
        payload: Bytes<'_>,
        signature: &dyn Signature,
    ) -> Result<bool, VerifyError> {
        let exported = signature.try_export()?;
        let bytes: [u8; SIGNATURE_SIZE] = exported.as_slice().try_into().map_err(|_| {
            VerifyError::InvalidSignatureLength(exported.len(), SIGNATURE_SIZE)
        })?;
        let signature = ed25519_dalek::Signature::from_bytes(&bytes);
        Ok(self.key.verify(payload.as_slice(), &signature).is_ok())
    }

    fn try_export(&self) -> Result<Buffer, ExportError> {
        if !self.extractable {
            return Err(ExportError::NotExtractable);
        }
        Ok(Buffer::copy_from(self.key.as_bytes()))
    }

    fn try_export_jwk(&self) -> Result<VerifyingKeyJwk, ExportError> {
        let public = self.try_export()?;
        Ok(VerifyingKeyJwk::new(public.as_slice()))
    }
}

impl std::fmt::Debug for DalekVerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DalekVerifyingKey({})", hex::encode(self.key.as_bytes()))
    }
}

struct DalekSignature(ed25519_dalek::Signature);

impl Signature for DalekSignature {
    fn try_export(&self) -> Result<Buffer, ExportError> {
        Ok(Buffer::copy_from(&self.0.to_bytes()))
    }
}

impl std::fmt::Debug for DalekSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DalekSignature({})", hex::encode(self.0.to_bytes()))
    }
}

struct DalekSigningKeyFactory;

impl SigningKeyFactory for DalekSigningKeyFactory {
    fn try_random(&self, extractable: bool) -> Result<Box<dyn SigningKey>, GenerateError> {
        let mut csprng: OsRng = OsRng;
        let key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Ok(Box::new(DalekSigningKey { key, extractable }))
    }

    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        let mut seed: [u8; SIGNING_KEY_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidKeyLength(bytes.len(), SIGNING_KEY_SIZE))?;
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Box::new(DalekSigningKey { key, extractable }))
    }

    fn try_import_jwk(
        &self,
        jwk: &SigningKeyJwk,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        jwk.validate()?;
        let mut seed = jwk.seed()?;
        let public = jwk.public()?;
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        if key.verifying_key().as_bytes() != &public {
            return Err(ImportError::PublicKeyMismatch);
        }
        Ok(Box::new(DalekSigningKey { key, extractable }))
    }
}

struct DalekVerifyingKeyFactory;

impl VerifyingKeyFactory for DalekVerifyingKeyFactory {
    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError> {
        let point: [u8; VERIFYING_KEY_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidKeyLength(bytes.len(), VERIFYING_KEY_SIZE))?;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&point)
            .map_err(|err| ImportError::Engine(err.to_string()))?;
        Ok(Box::new(DalekVerifyingKey { key, extractable }))
    }

    fn try_import_jwk(
        &self,
        jwk: &VerifyingKeyJwk,
        extractable: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError> {
        jwk.validate()?;
        let point = jwk.public()?;
        self.try_import(Bytes::from(&point), extractable)
    }
}

struct DalekSignatureFactory;

impl SignatureFactory for DalekSignatureFactory {
    fn try_import(&self, bytes: Bytes<'_>) -> Result<Box<dyn Signature>, ImportError> {
        let bytes: [u8; SIGNATURE_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidSignatureLength(bytes.len(), SIGNATURE_SIZE))?;
        Ok(Box::new(DalekSignature(ed25519_dalek::Signature::from_bytes(
            &bytes,
        ))))
    }
}
