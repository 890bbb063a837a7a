// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end coverage of the capability contract: every assertion here goes
//! through `dyn` trait objects, the way backend-oblivious callers use the
//! crate.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ed25519_adapter::{
    Adapter, Bytes, GenerateError, ImportError, RegistryError, Signature,
    SignatureFactory, SigningKey, SigningKeyFactory, SigningKeyJwk, VerifyingKey,
    VerifyingKeyFactory, VerifyingKeyJwk, fallback, registry,
};

fn adapters() -> Vec<Adapter> {
    let mut adapters = Vec::new();
    #[cfg(feature = "ring")]
    adapters.push(ed25519_adapter::backend::ring::adapter());
    #[cfg(feature = "libcrux")]
    adapters.push(ed25519_adapter::backend::libcrux::adapter());
    #[cfg(feature = "dalek")]
    adapters.push(ed25519_adapter::backend::dalek::adapter());
    adapters
}

#[test]
fn sign_and_verify_across_all_backend_pairs() {
    for signer in adapters() {
        let key = signer.signing_key().try_random(true).unwrap();
        let signature = key.try_sign(Bytes::from(b"cross backend")).unwrap();
        let public_bytes = key.try_verifying_key().unwrap().try_export().unwrap();
        let signature_bytes = signature.try_export().unwrap();

        for verifier in adapters() {
            let public = verifier
                .verifying_key()
                .try_import(Bytes::from(public_bytes.as_slice()), true)
                .unwrap();
            let signature = verifier
                .signature()
                .try_import(Bytes::from(signature_bytes.as_slice()))
                .unwrap();

            assert!(
                public
                    .try_verify(Bytes::from(b"cross backend"), signature.as_ref())
                    .unwrap(),
                "{} signature did not verify under {}",
                signer.name(),
                verifier.name(),
            );
            assert!(
                !public
                    .try_verify(Bytes::from(b"cross backenc"), signature.as_ref())
                    .unwrap()
            );
        }
    }
}

#[test]
fn backends_agree_with_rfc8032_test_vector() {
    let seed = hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
        .unwrap();
    let public = hex::decode("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a")
        .unwrap();
    let signature = hex::decode(
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e0652249015\
         55fb8821590a33bacc61e39701cf9b46bd25bf5f0595bce24891eeca5fb5708e6",
    )
    .unwrap();

    for adapter in adapters() {
        let key = adapter
            .signing_key()
            .try_import(Bytes::from(&seed), true)
            .unwrap();
        assert_eq!(
            key.try_verifying_key()
                .unwrap()
                .try_export()
                .unwrap()
                .as_slice(),
            public.as_slice(),
            "{} derived a different public key",
            adapter.name(),
        );
        assert_eq!(
            key.try_sign(Bytes::from(b""))
                .unwrap()
                .try_export()
                .unwrap()
                .as_slice(),
            signature.as_slice(),
            "{} produced a different signature",
            adapter.name(),
        );
    }
}

#[test]
fn raw_and_jwk_round_trips_preserve_seed() {
    let seed = [0x5Au8; 32];
    for adapter in adapters() {
        let key = adapter
            .signing_key()
            .try_import(Bytes::from(&seed), true)
            .unwrap();
        assert_eq!(key.try_export().unwrap().as_slice(), &seed);

        let jwk = key.try_export_jwk().unwrap();
        let restored = adapter.signing_key().try_import_jwk(&jwk, true).unwrap();
        assert_eq!(restored.try_export().unwrap().as_slice(), &seed);
    }
}

#[test]
fn verifying_key_jwk_round_trip() {
    for adapter in adapters() {
        let key = adapter.signing_key().try_random(true).unwrap();
        let public = key.try_verifying_key().unwrap();
        let jwk = public.try_export_jwk().unwrap();

        let restored = adapter.verifying_key().try_import_jwk(&jwk, true).unwrap();
        assert_eq!(
            restored.try_export().unwrap().as_slice(),
            public.try_export().unwrap().as_slice()
        );
    }
}

#[cfg(feature = "dalek")]
#[test]
fn jwk_records_serialize_to_the_fixed_wire_shape() {
    let adapter = ed25519_adapter::backend::dalek::adapter();
    let key = adapter.signing_key().try_random(true).unwrap();
    let jwk = key.try_export_jwk().unwrap();

    let value: serde_json::Value = serde_json::to_value(&jwk).unwrap();
    assert_eq!(value["crv"], "Ed25519");
    assert_eq!(value["kty"], "OKP");
    assert!(value["d"].is_string());
    assert!(value["x"].is_string());
}

#[test]
fn thirty_one_byte_verifying_key_is_rejected_everywhere() {
    for adapter in adapters() {
        assert!(
            matches!(
                adapter
                    .verifying_key()
                    .try_import(Bytes::from(&[1u8; 31]), true),
                Err(ImportError::InvalidKeyLength(31, 32))
            ),
            "{} accepted a 31-byte verifying key",
            adapter.name(),
        );
    }
}

#[cfg(all(feature = "dalek", feature = "ring"))]
#[test]
fn registry_lifecycle() {
    assert!(matches!(
        registry::get(),
        Err(RegistryError::NotConfigured)
    ));

    registry::set(Some(ed25519_adapter::backend::dalek::adapter()));
    assert_eq!(registry::get().unwrap().name(), "dalek");

    registry::set(Some(ed25519_adapter::backend::ring::adapter()));
    assert_eq!(registry::get().unwrap().name(), "ring");

    registry::set(None);
    assert!(matches!(
        registry::get(),
        Err(RegistryError::NotConfigured)
    ));
}

#[test]
fn panicking_and_try_forms_agree_on_success() {
    let adapter = fallback::preferred().unwrap();
    let key = adapter.signing_key().random(true);
    let public = key.verifying_key();
    let signature = key.sign(Bytes::from(b"dual convention"));
    assert!(public.verify(Bytes::from(b"dual convention"), signature.as_ref()));
    assert_eq!(key.export().as_slice(), key.try_export().unwrap().as_slice());
}

#[test]
#[should_panic(expected = "non-extractable")]
fn panicking_form_panics_where_try_form_errs() {
    let adapter = fallback::preferred().unwrap();
    let key = adapter.signing_key().random(false);
    key.export();
}

struct Unsupported(Arc<AtomicUsize>);

impl SigningKeyFactory for Unsupported {
    fn try_random(&self, _: bool) -> Result<Box<dyn SigningKey>, GenerateError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Err(GenerateError::Engine("engine unavailable".to_owned()))
    }

    fn try_import(
        &self,
        _: Bytes<'_>,
        _: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        Err(ImportError::Engine("engine unavailable".to_owned()))
    }

    fn try_import_jwk(
        &self,
        _: &SigningKeyJwk,
        _: bool,
    ) -> Result<Box<dyn SigningKey>, ImportError> {
        Err(ImportError::Engine("engine unavailable".to_owned()))
    }
}

impl VerifyingKeyFactory for Unsupported {
    fn try_import(
        &self,
        _: Bytes<'_>,
        _: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError> {
        Err(ImportError::Engine("engine unavailable".to_owned()))
    }

    fn try_import_jwk(
        &self,
        _: &VerifyingKeyJwk,
        _: bool,
    ) -> Result<Box<dyn VerifyingKey>, ImportError> {
        Err(ImportError::Engine("engine unavailable".to_owned()))
    }
}

impl SignatureFactory for Unsupported {
    fn try_import(&self, _: Bytes<'_>) -> Result<Box<dyn Signature>, ImportError> {
        Err(ImportError::Engine("engine unavailable".to_owned()))
    }
}

fn unsupported_adapter(probes: Arc<AtomicUsize>) -> Adapter {
    Adapter::new(
        "unsupported",
        Arc::new(Unsupported(probes.clone())),
        Arc::new(Unsupported(probes.clone())),
        Arc::new(Unsupported(probes)),
    )
}

#[cfg(feature = "dalek")]
#[test]
fn fallback_skips_unsupported_candidate_and_probes_it_once() {
    let probes = Arc::new(AtomicUsize::new(0));
    let chain = [
        unsupported_adapter(probes.clone()),
        ed25519_adapter::backend::dalek::adapter(),
    ];

    let selected = fallback::first_supported(chain).unwrap();
    assert_eq!(selected.name(), "dalek");
    assert_eq!(probes.load(Ordering::SeqCst), 1);

    // The selected adapter is fully usable.
    let key = selected.signing_key().try_random(true).unwrap();
    let signature = key.try_sign(Bytes::from(b"hello")).unwrap();
    assert!(
        key.try_verifying_key()
            .unwrap()
            .try_verify(Bytes::from(b"hello"), signature.as_ref())
            .unwrap()
    );
}

#[test]
fn unprobed_unsupported_adapter_still_reports_false() {
    let probes = Arc::new(AtomicUsize::new(0));
    let adapter = unsupported_adapter(probes.clone());
    assert!(!adapter.probe());
    assert!(!adapter.probe());
    assert_eq!(probes.load(Ordering::SeqCst), 2);
}
