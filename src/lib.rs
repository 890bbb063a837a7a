// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend-agnostic Ed25519 signing and verification.
//!
//! One capability contract — [`SigningKey`], [`VerifyingKey`], [`Signature`]
//! and their three factories, bundled as an [`Adapter`] — satisfied by
//! several interchangeable engines: [`ring`](backend::ring) (audited,
//! BoringSSL-derived), [`libcrux`](backend::libcrux) (formally verified) and
//! [`dalek`](backend::dalek) (portable pure software). Callers pick an
//! engine at runtime through [`fallback`] probing or install one process-wide
//! via [`registry`], and never name a concrete backend afterwards.
//!
//! ```
//! use ed25519_adapter::{Bytes, fallback, registry};
//!
//! let adapter = fallback::preferred().expect("no usable ed25519 engine");
//! registry::set(Some(adapter));
//!
//! let adapter = registry::get()?;
//! let key = adapter.signing_key().try_random(true)?;
//! let signature = key.try_sign(Bytes::from(b"hello"))?;
//!
//! let public = key.try_verifying_key()?;
//! assert!(public.try_verify(Bytes::from(b"hello"), signature.as_ref())?);
//! # registry::set(None);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
pub mod backend;
mod buffer;
mod contract;
mod error;
pub mod fallback;
mod jwk;
pub mod registry;

pub use buffer::{Buffer, Bytes};
pub use contract::{
    Adapter, SIGNATURE_SIZE, SIGNING_KEY_SIZE, Signature, SignatureFactory, SigningKey,
    SigningKeyFactory, VERIFYING_KEY_SIZE, VerifyingKey, VerifyingKeyFactory,
};
pub use error::{
    ConvertError, ExportError, GenerateError, ImportError, RegistryError, SignError,
    VerifyError,
};
pub use jwk::{SigningKeyJwk, VerifyingKeyJwk};
