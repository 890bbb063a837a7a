// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interchangeable engines. Each submodule implements the full
//! capability contract against one engine and exposes an `adapter()`
//! constructor plus a memoized `is_supported()` probe.
#[cfg(feature = "dalek")]
pub mod dalek;
#[cfg(feature = "libcrux")]
pub mod libcrux;
#[cfg(feature = "ring")]
pub mod ring;
