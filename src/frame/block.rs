// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Deref;

use super::*;
use crate::error::*;

/// Up to [`BLOCK_MAX`] bytes of block data.
///
/// The length is checked once on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block(heapless::Vec<u8, BLOCK_MAX>);

impl Block {
    /// Copy `bytes` into a new block.
    pub fn new(bytes: &[u8]) -> Result<Self, EncodeError> {
        let len = bytes.len();
        heapless::Vec::from_slice(bytes)
            .map(Self)
            .map_err(|()| EncodeError::PayloadTooLarge(u8::try_from(len).unwrap_or(u8::MAX)))
    }

    /// Parse a length-prefixed block (`len, b0 .. b(len-1)`).
    ///
    /// Bytes following the announced length are ignored.
    pub fn from_length_prefixed(bytes: &[u8]) -> Result<Self, EncodeError> {
        let (&len, data) = bytes.split_first().ok_or(EncodeError::InvalidPayload)?;
        if usize::from(len) > BLOCK_MAX {
            return Err(EncodeError::PayloadTooLarge(len));
        }
        let data = data.get(..usize::from(len)).ok_or(EncodeError::InvalidPayload)?;
        Self::new(data)
    }

    /// Write the block in its length-prefixed form into `buf`.
    ///
    /// It returns the number of bytes written.
    pub fn write_length_prefixed(&self, buf: &mut [u8]) -> Result<usize, DecodeError> {
        let len = self.len();
        let target = buf.get_mut(..=len).ok_or(DecodeError::BufferSize)?;
        let (prefix, data) = target.split_at_mut(1);
        prefix[0] = self.byte_count();
        data.copy_from_slice(&self.0);
        Ok(len + 1)
    }

    /// Number of bytes as it appears on the wire.
    #[must_use]
    pub fn byte_count(&self) -> u8 {
        // bounded by BLOCK_MAX
        self.0.len() as u8
    }
}

impl Deref for Block {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(all(feature = "defmt", target_os = "none"))]
impl defmt::Format for Block {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Block({=[u8]})", &**self)
    }
}
