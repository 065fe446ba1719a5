//! Extent, Resolution and Point3 - voxel grid geometry
//!
//! An [`Extent`] is the (width, height, depth) shape of a voxel grid. Voxels
//! are addressed plane by plane: `z` selects the plane and
//! [`Extent::offset`] gives the position inside that plane's flat buffer.

use crate::error::{Error, Result};
use std::fmt;

/// Shape of a voxel grid. All sides are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    x: u32,
    y: u32,
    z: u32,
}

impl Extent {
    /// Create a new extent
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtent`] if any side is zero.
    pub fn new(x: u32, y: u32, z: u32) -> Result<Self> {
        if x == 0 || y == 0 || z == 0 {
            return Err(Error::InvalidExtent { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    /// Create a single-plane extent
    pub fn new_2d(x: u32, y: u32) -> Result<Self> {
        Self::new(x, y, 1)
    }

    /// Size along x
    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Size along y
    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Size along z (number of planes)
    #[inline]
    pub fn z(&self) -> u32 {
        self.z
    }

    /// Number of voxels in one plane
    #[inline]
    pub fn volume_xy(&self) -> usize {
        self.x as usize * self.y as usize
    }

    /// Total number of voxels
    #[inline]
    pub fn volume(&self) -> usize {
        self.volume_xy() * self.z as usize
    }

    /// Flat offset of (x, y) inside a plane buffer
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.x as usize + x as usize
    }

    /// Inverse of [`Extent::offset`]
    #[inline]
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let w = self.x as usize;
        ((offset % w) as u32, (offset / w) as u32)
    }

    /// Check whether a signed coordinate lies inside the grid
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as u32) < self.x
            && (y as u32) < self.y
            && (z as u32) < self.z
    }

    /// Check whether a point lies inside the grid
    #[inline]
    pub fn contains_point(&self, p: Point3) -> bool {
        self.contains(p.x, p.y, p.z)
    }

    /// Same extent with a different depth
    pub fn with_z(&self, z: u32) -> Result<Self> {
        Self::new(self.x, self.y, z)
    }

    /// Returns an error unless `other` equals `self`
    pub fn check_equal(&self, other: Extent) -> Result<()> {
        if *self != other {
            return Err(Error::DimensionMismatch {
                expected: *self,
                actual: other,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Physical size of one voxel along each axis.
///
/// Carried alongside voxel data; none of the kernels interpret it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Resolution {
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        if !(x > 0.0 && y > 0.0 && z > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "resolution must be positive: {x}, {y}, {z}"
            )));
        }
        Ok(Self { x, y, z })
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

/// Integer voxel coordinate (may lie outside a grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3 {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Add for Point3 {
    type Output = Point3;

    #[inline]
    fn add(self, other: Point3) -> Point3 {
        Point3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Point3 {
    type Output = Point3;

    #[inline]
    fn sub(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_creation() {
        let e = Extent::new(10, 20, 3).unwrap();
        assert_eq!(e.volume_xy(), 200);
        assert_eq!(e.volume(), 600);
        assert!(Extent::new(0, 5, 5).is_err());
        assert!(Extent::new(5, 5, 0).is_err());
    }

    #[test]
    fn test_extent_offset_roundtrip() {
        let e = Extent::new(7, 5, 1).unwrap();
        assert_eq!(e.offset(3, 2), 17);
        assert_eq!(e.position(17), (3, 2));
    }

    #[test]
    fn test_extent_contains() {
        let e = Extent::new(4, 4, 2).unwrap();
        assert!(e.contains(0, 0, 0));
        assert!(e.contains(3, 3, 1));
        assert!(!e.contains(4, 0, 0));
        assert!(!e.contains(0, -1, 0));
        assert!(!e.contains(0, 0, 2));
    }

    #[test]
    fn test_check_equal() {
        let a = Extent::new(4, 4, 2).unwrap();
        let b = Extent::new(4, 4, 1).unwrap();
        assert!(a.check_equal(a).is_ok());
        assert!(matches!(
            a.check_equal(b),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_resolution() {
        assert!(Resolution::new(1.0, 0.5, 2.0).is_ok());
        assert!(Resolution::new(0.0, 1.0, 1.0).is_err());
        assert_eq!(Resolution::default().z, 1.0);
    }
}
