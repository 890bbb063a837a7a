// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide holder of the active adapter.
//!
//! The registry is plain shared state: last write wins, and readers that
//! already took a clone keep using it. Configure the registry once, before
//! spawning anything that reads it, if you need every consumer to agree on
//! the backend.
use std::sync::RwLock;

use crate::contract::Adapter;
use crate::error::RegistryError;

static ACTIVE: RwLock<Option<Adapter>> = RwLock::new(None);

/// Returns the active adapter.
///
/// Fails with [`RegistryError::NotConfigured`] until [`set`] installs one;
/// there is no default backend to fall back to.
pub fn get() -> Result<Adapter, RegistryError> {
    let guard = ACTIVE.read().map_err(|_| RegistryError::Poisoned)?;
    guard.clone().ok_or(RegistryError::NotConfigured)
}

/// Installs or clears the active adapter. Clearing with `None` is an
/// explicit, valid state: subsequent [`get`] calls fail again.
pub fn set(adapter: Option<Adapter>) {
    match &adapter {
        Some(adapter) => {
            tracing::debug!(backend = adapter.name(), "installing ed25519 adapter")
        }
        None => tracing::debug!("clearing ed25519 adapter"),
    }

    match ACTIVE.write() {
        Ok(mut guard) => *guard = adapter,
        Err(poisoned) => *poisoned.into_inner() = adapter,
    }
}
