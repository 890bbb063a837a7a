// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owned byte buffers and the borrowed-or-owned input union used across all
//! backends.
use std::fmt;

use zeroize::Zeroize;

/// Owned byte buffer with sole access to its contents.
///
/// Every export operation returns a `Buffer`: the caller now exclusively owns
/// the bytes and they are released (and zeroed) exactly once when the buffer
/// is dropped. Moving the bytes out with [`Buffer::into_vec`] transfers the
/// release responsibility along with them.
pub struct Buffer(Vec<u8>);

impl Buffer {
    /// Copies the given bytes into a fresh buffer.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Borrowed view of the contents, valid as long as the buffer lives.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Moves the contents out, handing the release responsibility over to the
    /// caller. The vacated buffer no longer zeroes anything on drop.
    pub fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer({} bytes)", self.0.len())
    }
}

/// Payload or key bytes handed to an operation: either borrowed from the
/// caller or already owned by a [`Buffer`].
///
/// Both variants normalize to a plain byte view without copying. Operations
/// that keep the bytes around copy them at that point; passing an owned
/// buffer hands it over for the duration of the call.
pub enum Bytes<'a> {
    Borrowed(&'a [u8]),
    Owned(Buffer),
}

impl Bytes<'_> {
    /// The bytes themselves, wherever they live.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Bytes::Borrowed(bytes) => bytes,
            Bytes::Owned(buffer) => buffer.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<'a> From<&'a [u8]> for Bytes<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Bytes::Borrowed(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Bytes<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Bytes::Borrowed(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Bytes<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Bytes::Borrowed(bytes)
    }
}

impl From<Vec<u8>> for Bytes<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::Owned(Buffer::from(bytes))
    }
}

impl From<Buffer> for Bytes<'_> {
    fn from(buffer: Buffer) -> Self {
        Bytes::Owned(buffer)
    }
}
