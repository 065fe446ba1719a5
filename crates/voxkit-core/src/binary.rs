//! Binary values - the concrete encoding of "on" and "off"
//!
//! A mask stores two distinct scalar values. Which one means foreground is
//! decided by its [`BinaryValuesByte`], not by the bytes themselves, so
//! swapping the encoding flips the mask without touching any voxel.

use crate::error::{Error, Result};

/// On/off encoding in the full voxel value range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryValues {
    on: u32,
    off: u32,
}

impl BinaryValues {
    /// Create a new encoding
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinaryValues`] if `on == off`.
    pub fn new(on: u32, off: u32) -> Result<Self> {
        if on == off {
            return Err(Error::InvalidBinaryValues { on, off });
        }
        Ok(Self { on, off })
    }

    #[inline]
    pub fn on(&self) -> u32 {
        self.on
    }

    #[inline]
    pub fn off(&self) -> u32 {
        self.off
    }

    /// The same pair with on and off swapped
    pub fn inverted(&self) -> Self {
        Self {
            on: self.off,
            off: self.on,
        }
    }

    /// Narrow to the byte encoding used by masks
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinaryValues`] if either value exceeds 255.
    pub fn to_byte(&self) -> Result<BinaryValuesByte> {
        match (u8::try_from(self.on), u8::try_from(self.off)) {
            (Ok(on), Ok(off)) => BinaryValuesByte::new(on, off),
            _ => Err(Error::InvalidBinaryValues {
                on: self.on,
                off: self.off,
            }),
        }
    }
}

impl Default for BinaryValues {
    fn default() -> Self {
        Self { on: 255, off: 0 }
    }
}

/// On/off encoding for 8-bit masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryValuesByte {
    on: u8,
    off: u8,
}

impl BinaryValuesByte {
    pub fn new(on: u8, off: u8) -> Result<Self> {
        if on == off {
            return Err(Error::InvalidBinaryValues {
                on: on as u32,
                off: off as u32,
            });
        }
        Ok(Self { on, off })
    }

    #[inline]
    pub fn on(&self) -> u8 {
        self.on
    }

    #[inline]
    pub fn off(&self) -> u8 {
        self.off
    }

    #[inline]
    pub fn is_on(&self, value: u8) -> bool {
        value == self.on
    }

    #[inline]
    pub fn is_off(&self, value: u8) -> bool {
        value == self.off
    }

    /// Byte for a logical state
    #[inline]
    pub fn value_for(&self, on: bool) -> u8 {
        if on { self.on } else { self.off }
    }

    pub fn inverted(&self) -> Self {
        Self {
            on: self.off,
            off: self.on,
        }
    }

    /// Widen to the full-range encoding
    pub fn to_int(&self) -> BinaryValues {
        BinaryValues {
            on: self.on as u32,
            off: self.off as u32,
        }
    }
}

impl Default for BinaryValuesByte {
    fn default() -> Self {
        Self { on: 255, off: 0 }
    }
}
