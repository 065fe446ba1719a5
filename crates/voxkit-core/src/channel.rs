//! Channel - a voxel grid of any supported element type
//!
//! Kernels are generic over [`VoxelType`](crate::VoxelType); a [`Channel`]
//! is the type-erased form used where the element type is only known at
//! runtime, such as named entries of a processing pipeline.

use crate::error::{Error, Result};
use crate::{Extent, Resolution, VoxelKind, Voxels};

/// Voxel grid tagged with its element type
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelData {
    U8(Voxels<u8>),
    U16(Voxels<u16>),
    F32(Voxels<f32>),
}

impl ChannelData {
    pub fn kind(&self) -> VoxelKind {
        match self {
            ChannelData::U8(_) => VoxelKind::U8,
            ChannelData::U16(_) => VoxelKind::U16,
            ChannelData::F32(_) => VoxelKind::F32,
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            ChannelData::U8(v) => v.extent(),
            ChannelData::U16(v) => v.extent(),
            ChannelData::F32(v) => v.extent(),
        }
    }
}

impl From<Voxels<u8>> for ChannelData {
    fn from(v: Voxels<u8>) -> Self {
        ChannelData::U8(v)
    }
}

impl From<Voxels<u16>> for ChannelData {
    fn from(v: Voxels<u16>) -> Self {
        ChannelData::U16(v)
    }
}

impl From<Voxels<f32>> for ChannelData {
    fn from(v: Voxels<f32>) -> Self {
        ChannelData::F32(v)
    }
}

/// An intensity image: voxel data plus its physical resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    data: ChannelData,
    resolution: Resolution,
}

impl Channel {
    /// Create a zero-filled channel of the given element type
    pub fn new(extent: Extent, kind: VoxelKind) -> Self {
        let data = match kind {
            VoxelKind::U8 => ChannelData::U8(Voxels::new(extent)),
            VoxelKind::U16 => ChannelData::U16(Voxels::new(extent)),
            VoxelKind::F32 => ChannelData::F32(Voxels::new(extent)),
        };
        Self {
            data,
            resolution: Resolution::default(),
        }
    }

    pub fn from_data(data: ChannelData) -> Self {
        Self {
            data,
            resolution: Resolution::default(),
        }
    }

    pub fn from_u8(voxels: Voxels<u8>) -> Self {
        Self::from_data(ChannelData::U8(voxels))
    }

    pub fn from_u16(voxels: Voxels<u16>) -> Self {
        Self::from_data(ChannelData::U16(voxels))
    }

    pub fn from_f32(voxels: Voxels<f32>) -> Self {
        Self::from_data(ChannelData::F32(voxels))
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    #[inline]
    pub fn kind(&self) -> VoxelKind {
        self.data.kind()
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.data.extent()
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn data(&self) -> &ChannelData {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut ChannelData {
        &mut self.data
    }

    pub fn into_data(self) -> ChannelData {
        self.data
    }

    /// Replace the voxel data, keeping the resolution.
    ///
    /// # Panics
    ///
    /// Panics if the extent changes.
    pub fn replace_data(&mut self, data: ChannelData) {
        assert_eq!(
            self.extent(),
            data.extent(),
            "replacement voxels must keep the extent"
        );
        self.data = data;
    }

    /// Borrow as an 8-bit grid
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVoxelKind`] naming the actual type.
    pub fn as_u8(&self) -> Result<&Voxels<u8>> {
        match &self.data {
            ChannelData::U8(v) => Ok(v),
            other => Err(Error::UnsupportedVoxelKind(other.kind().name())),
        }
    }

    pub fn as_u16(&self) -> Result<&Voxels<u16>> {
        match &self.data {
            ChannelData::U16(v) => Ok(v),
            other => Err(Error::UnsupportedVoxelKind(other.kind().name())),
        }
    }

    pub fn as_f32(&self) -> Result<&Voxels<f32>> {
        match &self.data {
            ChannelData::F32(v) => Ok(v),
            other => Err(Error::UnsupportedVoxelKind(other.kind().name())),
        }
    }

    pub fn as_u8_mut(&mut self) -> Result<&mut Voxels<u8>> {
        match &mut self.data {
            ChannelData::U8(v) => Ok(v),
            other => Err(Error::UnsupportedVoxelKind(other.kind().name())),
        }
    }

    pub fn as_u16_mut(&mut self) -> Result<&mut Voxels<u16>> {
        match &mut self.data {
            ChannelData::U16(v) => Ok(v),
            other => Err(Error::UnsupportedVoxelKind(other.kind().name())),
        }
    }

    pub fn as_f32_mut(&mut self) -> Result<&mut Voxels<f32>> {
        match &mut self.data {
            ChannelData::F32(v) => Ok(v),
            other => Err(Error::UnsupportedVoxelKind(other.kind().name())),
        }
    }
}

impl<T> From<Voxels<T>> for Channel
where
    ChannelData: From<Voxels<T>>,
{
    fn from(voxels: Voxels<T>) -> Self {
        Channel::from_data(ChannelData::from(voxels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kinds() {
        let e = Extent::new(2, 2, 1).unwrap();
        let c = Channel::new(e, VoxelKind::U16);
        assert_eq!(c.kind(), VoxelKind::U16);
        assert_eq!(c.extent(), e);
        assert!(c.as_u16().is_ok());
        assert!(matches!(c.as_u8(), Err(Error::UnsupportedVoxelKind("u16"))));
    }

    #[test]
    fn test_channel_from_voxels() {
        let v = Voxels::from_slice_2d(2, 1, &[1.5f32, 2.5]).unwrap();
        let mut c: Channel = v.into();
        assert_eq!(c.kind(), VoxelKind::F32);
        c.as_f32_mut().unwrap().set(0, 0, 0, 9.0);
        assert_eq!(c.as_f32().unwrap().get(0, 0, 0), 9.0);
    }

    #[test]
    #[should_panic(expected = "replacement voxels must keep the extent")]
    fn test_replace_data_wrong_extent() {
        let mut c = Channel::new(Extent::new(2, 2, 1).unwrap(), VoxelKind::U8);
        c.replace_data(ChannelData::U8(Voxels::new(Extent::new(3, 3, 1).unwrap())));
    }
}
