//! Mask - a binary voxel image
//!
//! A mask is an 8-bit voxel grid whose samples are all either the "on" or
//! the "off" byte of its [`BinaryValuesByte`] encoding.
//!
//! There are two ways to invert a mask:
//!
//! - [`Mask::invert_interpretation`] swaps the encoding and leaves the
//!   bytes untouched. It is O(1) and flips which voxels count as on.
//! - [`Mask::invert_voxels`] rewrites every byte and keeps the encoding.

use crate::error::{Error, Result};
use crate::{BinaryValuesByte, Channel, Extent, Resolution, Voxels};

/// Binary voxel image
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    voxels: Voxels<u8>,
    binary_values: BinaryValuesByte,
    resolution: Resolution,
}

impl Mask {
    /// Create an all-off mask with the default (255, 0) encoding
    pub fn new(extent: Extent) -> Self {
        Self::new_with(extent, BinaryValuesByte::default())
    }

    /// Create an all-off mask with the given encoding
    pub fn new_with(extent: Extent, binary_values: BinaryValuesByte) -> Self {
        Self {
            voxels: Voxels::filled(extent, binary_values.off()),
            binary_values,
            resolution: Resolution::default(),
        }
    }

    /// Wrap an existing voxel grid as a mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotBinary`] naming the first voxel that is neither
    /// on nor off.
    pub fn from_voxels(voxels: Voxels<u8>, binary_values: BinaryValuesByte) -> Result<Self> {
        let extent = voxels.extent();
        for z in 0..extent.z() {
            let plane = voxels.plane_slice(z);
            if let Some(i) = plane
                .iter()
                .position(|&v| v != binary_values.on() && v != binary_values.off())
            {
                let (x, y) = extent.position(i);
                return Err(Error::NotBinary {
                    x,
                    y,
                    z,
                    value: plane[i] as u32,
                });
            }
        }
        Ok(Self {
            voxels,
            binary_values,
            resolution: Resolution::default(),
        })
    }

    /// Build a mask by evaluating a predicate at every voxel
    pub fn from_fn(
        extent: Extent,
        binary_values: BinaryValuesByte,
        mut on: impl FnMut(u32, u32, u32) -> bool,
    ) -> Self {
        Self {
            voxels: Voxels::from_fn(extent, |x, y, z| binary_values.value_for(on(x, y, z))),
            binary_values,
            resolution: Resolution::default(),
        }
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.voxels.extent()
    }

    /// Underlying byte grid
    #[inline]
    pub fn voxels(&self) -> &Voxels<u8> {
        &self.voxels
    }

    #[inline]
    pub fn binary_values(&self) -> BinaryValuesByte {
        self.binary_values
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Whether the voxel at (x, y, z) is on
    #[inline]
    pub fn is_on(&self, x: u32, y: u32, z: u32) -> bool {
        self.binary_values.is_on(self.voxels.get(x, y, z))
    }

    /// Switch a voxel on or off
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, z: u32, on: bool) {
        let v = self.binary_values.value_for(on);
        self.voxels.set(x, y, z, v);
    }

    /// Number of on voxels
    pub fn count_on(&self) -> usize {
        let on = self.binary_values.on();
        self.voxels.count_where(|v| v == on)
    }

    pub fn count_off(&self) -> usize {
        self.extent().volume() - self.count_on()
    }

    /// Swap the encoding so the effective image flips. No voxel is touched.
    pub fn invert_interpretation(self) -> Mask {
        Mask {
            binary_values: self.binary_values.inverted(),
            ..self
        }
    }

    /// Rewrite every voxel (on <-> off), keeping the encoding.
    pub fn invert_voxels(&mut self) {
        let bv = self.binary_values;
        for v in self.voxels.iter_mut() {
            *v = if bv.is_on(*v) { bv.off() } else { bv.on() };
        }
    }

    /// Replace the voxel grid with another of the same extent.
    ///
    /// # Panics
    ///
    /// Panics if the extent differs. The replacement must also hold only
    /// on/off bytes of this mask's encoding.
    pub fn replace_voxels(&mut self, voxels: Voxels<u8>) {
        self.voxels.replace(voxels);
    }

    /// Consume the mask, returning its byte grid
    pub fn into_voxels(self) -> Voxels<u8> {
        self.voxels
    }

    /// Copy as an 8-bit channel carrying the mask's resolution
    pub fn to_channel(&self) -> Channel {
        Channel::from_u8(self.voxels.clone()).with_resolution(self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> Extent {
        Extent::new(4, 3, 2).unwrap()
    }

    #[test]
    fn test_new_is_all_off() {
        let m = Mask::new(extent());
        assert_eq!(m.count_on(), 0);
        assert_eq!(m.count_off(), 24);
    }

    #[test]
    fn test_from_voxels_rejects_non_binary() {
        let mut v: Voxels<u8> = Voxels::new(extent());
        v.set(2, 1, 1, 7);
        match Mask::from_voxels(v, BinaryValuesByte::default()) {
            Err(Error::NotBinary { x, y, z, value }) => {
                assert_eq!((x, y, z, value), (2, 1, 1, 7));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invert_interpretation_keeps_bytes() {
        let m = Mask::from_fn(extent(), BinaryValuesByte::default(), |x, _, _| x == 0);
        let bytes = m.voxels().clone();
        assert_eq!(m.count_on(), 6);
        let inv = m.invert_interpretation();
        assert_eq!(inv.voxels(), &bytes);
        assert_eq!(inv.count_on(), 18);
        assert!(!inv.is_on(0, 0, 0));
        assert!(inv.is_on(1, 0, 0));
    }

    #[test]
    fn test_invert_voxels_keeps_encoding() {
        let mut m = Mask::from_fn(extent(), BinaryValuesByte::default(), |x, _, _| x == 0);
        m.invert_voxels();
        assert_eq!(m.binary_values(), BinaryValuesByte::default());
        assert_eq!(m.count_on(), 18);
        assert_eq!(m.voxels().get(0, 0, 0), 0);
        assert_eq!(m.voxels().get(1, 0, 0), 255);
    }

    #[test]
    fn test_set_uses_encoding() {
        let bv = BinaryValuesByte::new(1, 2).unwrap();
        let mut m = Mask::new_with(extent(), bv);
        m.set(3, 2, 1, true);
        assert_eq!(m.voxels().get(3, 2, 1), 1);
        assert_eq!(m.voxels().get(0, 0, 0), 2);
        assert_eq!(m.count_on(), 1);
    }
}
