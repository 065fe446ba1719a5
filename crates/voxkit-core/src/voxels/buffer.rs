//! Per-plane buffer views
//!
//! Kernels that sweep a plane row by row address samples by flat offset
//! rather than by (x, y); these views wrap one plane's buffer for that.

use super::VoxelType;

/// Read-only view of one z-plane
#[derive(Debug, Clone, Copy)]
pub struct VoxelBuffer<'a, T> {
    data: &'a [T],
}

impl<'a, T: VoxelType> VoxelBuffer<'a, T> {
    pub(crate) fn new(data: &'a [T]) -> Self {
        Self { data }
    }

    /// Sample at a flat offset
    #[inline]
    pub fn get(&self, offset: usize) -> T {
        self.data[offset]
    }

    /// Number of samples in the plane
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

/// Mutable view of one z-plane
#[derive(Debug)]
pub struct VoxelBufferMut<'a, T> {
    data: &'a mut [T],
}

impl<'a, T: VoxelType> VoxelBufferMut<'a, T> {
    pub(crate) fn new(data: &'a mut [T]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn get(&self, offset: usize) -> T {
        self.data[offset]
    }

    /// Write a sample at a flat offset
    #[inline]
    pub fn put(&mut self, offset: usize, value: T) {
        self.data[offset] = value;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

#[cfg(test)]
mod tests {
    use crate::{Extent, Voxels};

    #[test]
    fn test_buffer_put_get() {
        let e = Extent::new(4, 4, 2).unwrap();
        let mut v: Voxels<u8> = Voxels::new(e);
        {
            let mut plane = v.plane_mut(1);
            assert_eq!(plane.len(), 16);
            plane.put(e.offset(2, 3), 77);
        }
        assert_eq!(v.plane(1).get(14), 77);
        assert_eq!(v.get(2, 3, 1), 77);
        assert_eq!(v.plane(0).get(14), 0);
    }
}
