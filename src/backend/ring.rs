// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend over `ring`, the audited BoringSSL-derived engine.
//!
//! The engine's `Ed25519KeyPair` is an opaque handle that never yields its
//! seed back, so extractable keys retain a zeroized copy of the seed next to
//! the handle and non-extractable keys drop it at construction. Key and
//! signature lengths are validated eagerly at import, but the engine defers
//! public-point validation to verify time: importing 32 bytes that are not a
//! curve point succeeds and every verification against them reports `false`.
use std::sync::{Arc, OnceLock};

use ring::rand::SystemRandom;
use ring::signature::{ED25519, Ed25519KeyPair, KeyPair as _, UnparsedPublicKey};
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

const NAME: &str = "ring";

/// Bundles the ring backend's three factories.
pub fn adapter() -> Adapter {
    Adapter::new(
        NAME,
        Arc::new(RingSigningKeyFactory),
        Arc::new(RingVerifyingKeyFactory),
        Arc::new(RingSignatureFactory),
    )
}

/// Whether the ring engine is usable in this process.
///
/// Probed once by generating a disposable key; the result is memoized for
/// the process lifetime, so an engine that probed unsupported is never
/// tried again.
pub fn is_supported() -> bool {
    static SUPPORTED: OnceLock<bool> = OnceLock::new();
    *SUPPORTED.get_or_init(|| adapter().probe())
}

struct RingSigningKey {
    keypair: Ed25519KeyPair,
    // Present only for extractable keys; the handle cannot be asked for it.
    seed: Option<Buffer>,
}

impl SigningKey for RingSigningKey {
    fn try_verifying_key(&self) -> Result<Box<dyn VerifyingKey>, ConvertError> {
        let point: [u8; VERIFYING_KEY_SIZE] = self
            .keypair
            .public_key()
            .as_ref()
            .try_into()
            .map_err(|_| ConvertError::Engine("unexpected public key length".to_owned()))?;
        Ok(Box::new(RingVerifyingKey {
            point,
            extractable: true,
        }))
    }

    fn try_sign(&self, payload: Bytes<'_>) -> Result<Box<dyn Signature>, SignError> {
        let signature = self.keypair.sign(payload.as_slice());
        let bytes: [u8; SIGNATURE_SIZE] = signature
            .as_ref()
            .try_into()
            .map_err(|_| SignError::Engine("unexpected signature length".to_owned()))?;
        Ok(Box::new(RingSignature(bytes)))
    }

    fn try_export(&self) -> Result<Buffer, ExportError> {
        let seed = self.seed.as_ref().ok_or(ExportError::NotExtractable)?;
        Ok(Buffer::copy_from(seed.as_slice()))
    }

    fn try_export_jwk(&self) -> Result<SigningKeyJwk, ExportError> {
        let seed = self.try_export()?;
        Ok(SigningKeyJwk::new(
            seed.as_slice(),
            self.keypair.public_key().as_ref(),
        ))
    }
}

struct RingVerifyingKey {
    point: [u8; VERIFYING_KEY_SIZE],
    extractable: bool,
}

impl VerifyingKey for RingVerifyingKey {
    fn try_verify(
        &self,
        payload: Bytes<'_>,
        signature: &dyn Signature,
    ) -> Result<bool, VerifyError> {
        let exported = signature.try_export()?;
        if exported.len() != SIGNATURE_SIZE {
            return Err(VerifyError::InvalidSignatureLength(
                exported.len(),
                SIGNATURE_SIZE,
            ));
        }
        let key = UnparsedPublicKey::new(&ED25519, self.point.as_slice());
        Ok(key.verify(payload.as_slice(), exported.as_slice()).is_ok())
    }

    fn try_export(&self) -> Result<Buffer, ExportError> {
        if !self.extractable {
            return Err(ExportError::NotExtractable);
        }
        Ok(Buffer::copy_from(&self.point))
    }

    fn try_export_jwk(&self) -> Result<VerifyingKeyJwk, ExportError> {
        let public = self.try_export()?;
        Ok(VerifyingKeyJwk::new(public.as_slice()))
    }
}

impl std::fmt::Debug for RingVerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RingVerifyingKey({})", hex::encode(self.point))
    }
}

struct RingSignature([u8; SIGNATURE_SIZE]);

impl Signature for RingSignature {
    fn try_export(&self) -> Result<Buffer, ExportError> {
        Ok(Buffer::copy_from(&self.0))
    }
}

impl std::fmt::Debug for RingSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RingSignature({})", hex::encode(self.0))
    }
}

struct RingSigningKeyFactory;

impl SigningKeyFactory for RingSigningKeyFactory {
    fn try_random(&self, extractable: bool) -> Result<Box<dyn SigningKey>, GenerateError> {
        let rng = SystemRandom::new();
        let mut seed: [u8; SIGNING_KEY_SIZE] = ring::rand::generate(&rng)
            .map_err(|_| GenerateError::Randomness)?
            .expose();

        let keypair = Ed25519KeyPair::from_seed_unchecked(&seed);
        let retained = extractable.then(|| Buffer::copy_from(&seed));
        seed.zeroize();

        let keypair = keypair.map_err(|err| GenerateError::Engine(err.to_string()))?;
        Ok(Box::new(RingSigningKey {
            keypair,
            seed: retained,
        }))
    }

    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        if bytes.len() != SIGNING_KEY_SIZE {
            return Err(ImportError::InvalidKeyLength(bytes.len(), SIGNING_KEY_SIZE));
        }
        let keypair = Ed25519KeyPair::from_seed_unchecked(bytes.as_slice())
            .map_err(|err| ImportError::Engine(err.to_string()))?;
        let retained = extractable.then(|| Buffer::copy_from(bytes.as_slice()));
        Ok(Box::new(RingSigningKey {
            keypair,
            seed: retained,
        }))
    }

    fn try_import_jwk(
        &self,
        jwk: &SigningKeyJwk,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        jwk.validate()?;
        let mut seed = jwk.seed()?;
        let public = jwk.public()?;

        // The engine's own codec rejects a d/x pair whose components are
        // inconsistent.
        let keypair = Ed25519KeyPair::from_seed_and_public_key(&seed, &public);
        let retained = extractable.then(|| Buffer::copy_from(&seed));
        seed.zeroize();

        let keypair = keypair.map_err(|err| ImportError::Engine(err.to_string()))?;
        Ok(Box::new(RingSigningKey {
            keypair,
            seed: retained,
        }))
    }
}

struct RingVerifyingKeyFactory;

impl VerifyingKeyFactory for RingVerifyingKeyFactory {
    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError> {
        let point: [u8; VERIFYING_KEY_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidKeyLength(bytes.len(), VERIFYING_KEY_SIZE))?;
        Ok(Box::new(RingVerifyingKey { point, extractable }))
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

struct RingSignatureFactory;

impl SignatureFactory for RingSignatureFactory {
    fn try_import(&self, bytes: Bytes<'_>) -> Result<Box<dyn Signature>, ImportError> {
        let bytes: [u8; SIGNATURE_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidSignatureLength(bytes.len(), SIGNATURE_SIZE))?;
        Ok(Box::new(RingSignature(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::adapter;
    use crate::buffer::Bytes;
    use crate::error::{ExportError, ImportError};

    #[test]
    fn sign_and_verify() {
        let adapter = adapter();
        let key = adapter.signing_key().try_random(true).unwrap();
        let public = key.try_verifying_key().unwrap();

        let signature = key.try_sign(Bytes::from(b"hello")).unwrap();
        assert!(
            public
                .try_verify(Bytes::from(b"hello"), signature.as_ref())
                .unwrap()
        );
        assert!(
            !public
                .try_verify(Bytes::from(b"hellp"), signature.as_ref())
                .unwrap()
        );
    }

    #[test]
    fn raw_round_trip() {
        let adapter = adapter();
        let seed = [7u8; 32];
        let key = adapter
            .signing_key()
            .try_import(Bytes::from(&seed), true)
            .unwrap();
        assert_eq!(key.try_export().unwrap().as_slice(), &seed);
    }

    #[test]
    fn jwk_round_trip() {
        let adapter = adapter();
        let key = adapter.signing_key().try_random(true).unwrap();
        let jwk = key.try_export_jwk().unwrap();

        let restored = adapter.signing_key().try_import_jwk(&jwk, true).unwrap();
        assert_eq!(
            restored.try_export().unwrap().as_slice(),
            key.try_export().unwrap().as_slice()
        );
    }

    #[test]
    fn jwk_import_rejects_mismatched_public_point() {
        let adapter = adapter();
        let key = adapter.signing_key().try_random(true).unwrap();
        let other = adapter.signing_key().try_random(true).unwrap();

        let mut jwk = key.try_export_jwk().unwrap();
        jwk.x = other.try_export_jwk().unwrap().x.clone();
        assert!(adapter.signing_key().try_import_jwk(&jwk, true).is_err());
    }

    #[test]
    fn non_extractable_key_refuses_export_but_signs() {
        let adapter = adapter();
        let key = adapter.signing_key().try_random(false).unwrap();
        assert!(matches!(
            key.try_export(),
            Err(ExportError::NotExtractable)
        ));
        assert!(key.try_export_jwk().is_err());
        assert!(key.try_sign(Bytes::from(b"payload")).is_ok());
    }

    #[test]
    fn rejects_wrong_lengths() {
        let adapter = adapter();
        assert!(matches!(
            adapter.signing_key().try_import(Bytes::from(&[0u8; 33]), true),
            Err(ImportError::InvalidKeyLength(33, 32))
        ));
        assert!(matches!(
            adapter
                .verifying_key()
                .try_import(Bytes::from(&[0u8; 31]), true),
            Err(ImportError::InvalidKeyLength(31, 32))
        ));
        assert!(matches!(
            adapter.signature().try_import(Bytes::from(&[0u8; 65])),
            Err(ImportError::InvalidSignatureLength(65, 64))
        ));
    }

    #[test]
    fn garbage_point_verifies_false_not_error() {
        // Point validation is deferred to verify time in this backend.
        let adapter = adapter();
        let public = adapter
            .verifying_key()
            .try_import(Bytes::from(&[0xAAu8; 32]), true)
            .unwrap();
        let key = adapter.signing_key().try_random(true).unwrap();
        let signature = key.try_sign(Bytes::from(b"payload")).unwrap();
        assert!(
            !public
                .try_verify(Bytes::from(b"payload"), signature.as_ref())
                .unwrap()
        );
    }

    #[test]
    fn corrupted_signature_verifies_false() {
        let adapter = adapter();
        let key = adapter.signing_key().try_random(true).unwrap();
        let public = key.try_verifying_key().unwrap();
        let signature = key.try_sign(Bytes::from(b"payload")).unwrap();

        let mut bytes = signature.try_export().unwrap().into_vec();
        bytes[0] ^= 0x01;
        let corrupted = adapter.signature().try_import(Bytes::from(bytes)).unwrap();
        assert!(
            !public
                .try_verify(Bytes::from(b"payload"), corrupted.as_ref())
                .unwrap()
        );
    }
}
