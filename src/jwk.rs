// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON Web Key records for Ed25519 keys.
//!
//! Key material is encoded as unpadded base64url (RFC 4648 §5 without "=").
//! Import validates the fixed `crv`/`kty` fields and the decoded lengths;
//! everything else about a record is opaque to this crate.
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::contract::{SIGNING_KEY_SIZE, VERIFYING_KEY_SIZE};
use crate::error::ImportError;

/// Fixed `crv` field of every Ed25519 JWK.
pub const CURVE: &str = "Ed25519";

/// Fixed `kty` field of every Ed25519 JWK.
pub const KEY_TYPE: &str = "OKP";

/// JWK record of a signing key: private scalar `d` plus public point `x`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SigningKeyJwk {
    pub crv: String,
    pub kty: String,
    pub d: String,
    pub x: String,
}

impl SigningKeyJwk {
    /// Builds a record from raw private and public key bytes.
    pub fn new(seed: &[u8], public: &[u8]) -> Self {
        Self {
            crv: CURVE.to_owned(),
            kty: KEY_TYPE.to_owned(),
            d: encode_unpadded(seed),
            x: encode_unpadded(public),
        }
    }

    /// Checks the fixed curve and key type fields.
    pub fn validate(&self) -> Result<(), ImportError> {
        validate_fields(&self.crv, &self.kty)
    }

    /// Decodes the private scalar, enforcing its 32-byte length.
    pub fn seed(&self) -> Result<[u8; SIGNING_KEY_SIZE], ImportError> {
        decode_fixed("d", &self.d)
    }

    /// Decodes the public point, enforcing its 32-byte length.
    pub fn public(&self) -> Result<[u8; VERIFYING_KEY_SIZE], ImportError> {
        decode_fixed("x", &self.x)
    }
}

impl fmt::Debug for SigningKeyJwk {
    // The private scalar stays out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyJwk")
            .field("crv", &self.crv)
            .field("kty", &self.kty)
            .field("d", &"<redacted>")
            .field("x", &self.x)
            .finish()
    }
}

/// JWK record of a verifying key: public point `x` only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKeyJwk {
    pub crv: String,
    pub kty: String,
    pub x: String,
}

impl VerifyingKeyJwk {
    /// Builds a record from raw public key bytes.
    pub fn new(public: &[u8]) -> Self {
        Self {
            crv: CURVE.to_owned(),
            kty: KEY_TYPE.to_owned(),
            x: encode_unpadded(public),
        }
    }

    /// Checks the fixed curve and key type fields.
    pub fn validate(&self) -> Result<(), ImportError> {
        validate_fields(&self.crv, &self.kty)
    }

    /// Decodes the public point, enforcing its 32-byte length.
    pub fn public(&self) -> Result<[u8; VERIFYING_KEY_SIZE], ImportError> {
        decode_fixed("x", &self.x)
    }
}

fn validate_fields(crv: &str, kty: &str) -> Result<(), ImportError> {
    if crv != CURVE {
        return Err(ImportError::UnexpectedCurve(crv.to_owned()));
    }
    if kty != KEY_TYPE {
        return Err(ImportError::UnexpectedKeyType(kty.to_owned()));
    }
    Ok(())
}

fn encode_unpadded(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

fn decode_fixed<const N: usize>(
    field: &'static str,
    value: &str,
) -> Result<[u8; N], ImportError> {
    let mut decoded = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| ImportError::MalformedBase64(field))?;
    let result = <[u8; N]>::try_from(decoded.as_slice())
        .map_err(|_| ImportError::InvalidKeyLength(decoded.len(), N));
    decoded.zeroize();
    result
}
