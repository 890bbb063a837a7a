// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend over `libcrux-ed25519`, formally verified code extracted from
//! HACL*.
//!
//! Keys are 32-byte seeds held in zeroized arrays; the engine hashes and
//! clamps internally per RFC 8032, so imported seeds round-trip unchanged.
//! Key and signature lengths are validated eagerly at import; like the ring
//! backend, public-point validation is deferred to verify time.
use std::sync::{Arc, OnceLock};

use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::ZeroizeOnDrop;

use crate::buffer::{Buffer, Bytes};
use crate::contract::{
    Adapter, SIGNATURE_SIZE, SIGNING_KEY_SIZE, Signature, SignatureFactory, SigningKey,
    SigningKeyFactory, VERIFYING_KEY_SIZE, VerifyingKey, VerifyingKeyFactory,
};
use crate::error::{
    ConvertError, ExportError, GenerateError, ImportError, SignError, VerifyError,
};
use crate::jwk::{SigningKeyJwk, VerifyingKeyJwk};

const NAME: &str = "libcrux";

/// Bundles the libcrux backend's three factories.
pub fn adapter() -> Adapter {
    Adapter::new(
        NAME,
        Arc::new(LibcruxSigningKeyFactory),
        Arc::new(LibcruxVerifyingKeyFactory),
        Arc::new(LibcruxSignatureFactory),
    )
}

/// Whether the libcrux engine is usable in this process.
///
/// Probed once by generating a disposable key; the result is memoized for
/// the process lifetime.
pub fn is_supported() -> bool {
    static SUPPORTED: OnceLock<bool> = OnceLock::new();
    *SUPPORTED.get_or_init(|| adapter().probe())
}

fn derive_public(seed: &[u8; SIGNING_KEY_SIZE]) -> [u8; VERIFYING_KEY_SIZE] {
    let mut public = [0u8; VERIFYING_KEY_SIZE];
    libcrux_ed25519::secret_to_public(&mut public, seed);
    public
}

#[derive(ZeroizeOnDrop)]
struct LibcruxSigningKey {
    seed: [u8; SIGNING_KEY_SIZE],
    #[zeroize(skip)]
    extractable: bool,
}

impl SigningKey for LibcruxSigningKey {
    fn try_verifying_key(&self) -> Result<Box<dyn VerifyingKey>, ConvertError> {
        Ok(Box::new(LibcruxVerifyingKey {
            point: derive_public(&self.seed),
            extractable: true,
        }))
    }

    fn try_sign(&self, payload: Bytes<'_>) -> Result<Box<dyn Signature>, SignError> {
        let bytes = libcrux_ed25519::sign(payload.as_slice(), &self.seed)
            .map_err(|_| SignError::Engine("signing rejected".to_owned()))?;
        Ok(Box::new(LibcruxSignature(bytes)))
    }

    fn try_export(&self) -> Result<Buffer, ExportError> {
        if !self.extractable {
            return Err(ExportError::NotExtractable);
        }
        Ok(Buffer::copy_from(&self.seed))
    }

    fn try_export_jwk(&self) -> Result<SigningKeyJwk, ExportError> {
        let seed = self.try_export()?;
        Ok(SigningKeyJwk::new(
            seed.as_slice(),
            &derive_public(&self.seed),
        ))
    }
}

struct LibcruxVerifyingKey {
    point: [u8; VERIFYING_KEY_SIZE],
    extractable: bool,
}

impl VerifyingKey for LibcruxVerifyingKey {
    fn try_verify(
        &self,
        payload: Bytes<'_>,
        signature: &dyn Signature,
    ) -> Result<bool, VerifyError> {
        let exported = signature.try_export()?;
        let bytes: [u8; SIGNATURE_SIZE] = exported.as_slice().try_into().map_err(|_| {
            VerifyError::InvalidSignatureLength(exported.len(), SIGNATURE_SIZE)
        })?;
        Ok(libcrux_ed25519::verify(payload.as_slice(), &self.point, &bytes).is_ok())
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

impl std::fmt::Debug for LibcruxVerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LibcruxVerifyingKey({})", hex::encode(self.point))
    }
}

struct LibcruxSignature([u8; SIGNATURE_SIZE]);

impl Signature for LibcruxSignature {
    fn try_export(&self) -> Result<Buffer, ExportError> {
        Ok(Buffer::copy_from(&self.0))
    }
}

impl std::fmt::Debug for LibcruxSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LibcruxSignature({})", hex::encode(self.0))
    }
}

struct LibcruxSigningKeyFactory;

impl SigningKeyFactory for LibcruxSigningKeyFactory {
    fn try_random(&self, extractable: bool) -> Result<Box<dyn SigningKey>, GenerateError> {
        let mut seed = [0u8; SIGNING_KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|_| GenerateError::Randomness)?;
        Ok(Box::new(LibcruxSigningKey { seed, extractable }))
    }

    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        let seed: [u8; SIGNING_KEY_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidKeyLength(bytes.len(), SIGNING_KEY_SIZE))?;
        Ok(Box::new(LibcruxSigningKey { seed, extractable }))
    }

    fn try_import_jwk(
        &self,
        jwk: &SigningKeyJwk,
        extractable: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        jwk.validate()?;
        let seed = jwk.seed()?;
        let public = jwk.public()?;
        let key = LibcruxSigningKey { seed, extractable };
        if derive_public(&key.seed) != public {
            return Err(ImportError::PublicKeyMismatch);
        }
        Ok(Box::new(key))
    }
}

struct LibcruxVerifyingKeyFactory;

impl VerifyingKeyFactory for LibcruxVerifyingKeyFactory {
    fn try_import(
        &self,
        bytes: Bytes<'_>,
        extractable: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError> {
        let point: [u8; VERIFYING_KEY_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidKeyLength(bytes.len(), VERIFYING_KEY_SIZE))?;
        Ok(Box::new(LibcruxVerifyingKey { point, extractable }))
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

struct LibcruxSignatureFactory;

impl SignatureFactory for LibcruxSignatureFactory {
    fn try_import(&self, bytes: Bytes<'_>) -> Result<Box<dyn Signature>, ImportError> {
        let bytes: [u8; SIGNATURE_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ImportError::InvalidSignatureLength(bytes.len(), SIGNATURE_SIZE))?;
        Ok(Box::new(LibcruxSignature(bytes)))
    }
}
