// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend selection with graceful fallback.
//!
//! The preference order is fixed: ring (audited, fastest) over libcrux
//! (formally verified) over dalek (portable pure software). Probing a
//! candidate never has side effects beyond generating and discarding one
//! key, and a rejected candidate is left untouched.
use crate::contract::Adapter;

/// Returns the first adapter in `candidates` whose probe succeeds.
///
/// Candidates after the first supported one are not probed.
pub fn first_supported(candidates: impl IntoIterator<Item = Adapter>) -> Option<Adapter> {
    for candidate in candidates {
        if candidate.probe() {
            tracing::debug!(backend = candidate.name(), "selected ed25519 backend");
            return Some(candidate);
        }
    }
    tracing::warn!("no supported ed25519 backend among the candidates");
    None
}

/// The ring engine if it probes as supported, otherwise dalek.
#[cfg(all(feature = "ring", feature = "dalek"))]
pub fn from_ring_or_dalek() -> Adapter {
    if crate::backend::ring::is_supported() {
        crate::backend::ring::adapter()
    } else {
        crate::backend::dalek::adapter()
    }
}

/// The ring engine if it probes as supported, otherwise libcrux.
#[cfg(all(feature = "ring", feature = "libcrux"))]
pub fn from_ring_or_libcrux() -> Adapter {
    if crate::backend::ring::is_supported() {
        crate::backend::ring::adapter()
    } else {
        crate::backend::libcrux::adapter()
    }
}

/// The most preferred engine that probes as supported, in the fixed order
/// ring, libcrux, dalek. `None` only when every compiled-in engine fails
/// its probe.
pub fn preferred() -> Option<Adapter> {
    #[cfg(feature = "ring")]
    if crate::backend::ring::is_supported() {
        return Some(crate::backend::ring::adapter());
    }
    #[cfg(feature = "libcrux")]
    if crate::backend::libcrux::is_supported() {
        return Some(crate::backend::libcrux::adapter());
    }
    #[cfg(feature = "dalek")]
    if crate::backend::dalek::is_supported() {
        return Some(crate::backend::dalek::adapter());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{first_supported, preferred};

    #[test]
    fn a_backend_is_always_available_by_default() {
        let adapter = preferred().unwrap();
        assert!(adapter.probe());
    }

    #[test]
    fn preference_order_is_deterministic() {
        let first = preferred().unwrap();
        let second = preferred().unwrap();
        assert_eq!(first.name(), second.name());
    }

    #[cfg(feature = "dalek")]
    #[test]
    fn skips_nothing_when_first_candidate_probes_fine() {
        let selected =
            first_supported([crate::backend::dalek::adapter()]).unwrap();
        assert_eq!(selected.name(), "dalek");
    }
}
