//! Main RAM: 2 MiB, byte addressed, little-endian.
//!
//! Offsets are relative to the start of RAM; address translation and
//! alignment exceptions are the caller's business.

use log::debug;
use thiserror::Error;

pub const RAM_SIZE: usize = 0x20_0000;

/// First byte of power-on content. The rest of RAM is filled from it.
pub const FILL_SEED: u8 = 0xca;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RamError {
    #[error("RAM access of {width} bytes at offset 0x{offset:08x} is out of bounds (size 0x{size:x})")]
    OutOfBounds { offset: u32, width: usize, size: usize },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Ram {
    data: Box<[u8]>,
}

impl Ram {
    /// Allocates RAM filled with deterministic garbage: the seed byte is
    /// copied forward, doubling the initialised prefix on every pass.
    pub fn new() -> Self {
        let mut data = vec![0u8; RAM_SIZE].into_boxed_slice();
        data[0] = FILL_SEED;

        let mut filled = 1;
        while filled < data.len() {
            let n = filled.min(data.len() - filled);
            data.copy_within(..n, filled);
            filled += n;
        }

        debug!("allocated {} KiB of RAM", RAM_SIZE / 1024);
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn range(&self, offset: u32, width: usize) -> Result<std::ops::Range<usize>, RamError> {
        let start = offset as usize;
        match start.checked_add(width) {
            Some(end) if end <= self.data.len() => Ok(start..end),
            _ => Err(RamError::OutOfBounds { offset, width, size: self.data.len() }),
        }
    }

    fn load<const N: usize>(&self, offset: u32) -> Result<[u8; N], RamError> {
        let r = self.range(offset, N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[r]);
        Ok(bytes)
    }

    fn store<const N: usize>(&mut self, offset: u32, bytes: [u8; N]) -> Result<(), RamError> {
        let r = self.range(offset, N)?;
        self.data[r].copy_from_slice(&bytes);
        Ok(())
    }

    /// Loads the little-endian word at `offset..offset + 4`.
    pub fn load_word(&self, offset: u32) -> Result<u32, RamError> {
        self.load(offset).map(u32::from_le_bytes)
    }

    pub fn store_word(&mut self, offset: u32, val: u32) -> Result<(), RamError> {
        self.store(offset, val.to_le_bytes())
    }

    pub fn load_half(&self, offset: u32) -> Result<u16, RamError> {
        self.load(offset).map(u16::from_le_bytes)
    }

    pub fn store_half(&mut self, offset: u32, val: u16) -> Result<(), RamError> {
        self.store(offset, val.to_le_bytes())
    }

    pub fn load_byte(&self, offset: u32) -> Result<u8, RamError> {
        self.load::<1>(offset).map(|[b]| b)
    }

    pub fn store_byte(&mut self, offset: u32, val: u8) -> Result<(), RamError> {
        self.store(offset, [val])
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ram").field("len", &self.data.len()).finish_non_exhaustive()
    }
}
