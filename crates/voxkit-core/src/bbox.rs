//! BoundingBox - axis-aligned box regions in a voxel grid
//!
//! A box is a corner plus an [`Extent`]. Unlike an extent it has a position,
//! so it can describe where a local sub-array sits inside a larger scene.

use crate::error::{Error, Result};
use crate::{Extent, Point3};

/// An axis-aligned box of voxels
///
/// Small and frequently copied, so this is a plain `Copy` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    corner: Point3,
    extent: Extent,
}

impl BoundingBox {
    /// Create a new box from its minimum corner and extent
    pub fn new(corner: Point3, extent: Extent) -> Self {
        Self { corner, extent }
    }

    /// Box covering an entire scene
    pub fn from_extent(extent: Extent) -> Self {
        Self {
            corner: Point3::default(),
            extent,
        }
    }

    /// Create a box from two inclusive corner points
    pub fn from_corners(a: Point3, b: Point3) -> Result<Self> {
        let min = Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        let extent = Extent::new(
            (max.x - min.x + 1) as u32,
            (max.y - min.y + 1) as u32,
            (max.z - min.z + 1) as u32,
        )?;
        Ok(Self {
            corner: min,
            extent,
        })
    }

    /// Minimum corner
    #[inline]
    pub fn corner(&self) -> Point3 {
        self.corner
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Maximum corner (inclusive)
    #[inline]
    pub fn corner_max(&self) -> Point3 {
        Point3::new(
            self.corner.x + self.extent.x() as i32 - 1,
            self.corner.y + self.extent.y() as i32 - 1,
            self.corner.z + self.extent.z() as i32 - 1,
        )
    }

    /// Check if a global point is inside the box
    #[inline]
    pub fn contains(&self, p: Point3) -> bool {
        let rel = p - self.corner;
        self.extent.contains(rel.x, rel.y, rel.z)
    }

    /// Check if this box lies fully inside a scene of the given extent
    pub fn within(&self, scene: Extent) -> bool {
        scene.contains_point(self.corner) && scene.contains_point(self.corner_max())
    }

    /// Returns an error unless the box lies inside the scene
    pub fn check_within(&self, scene: Extent) -> Result<()> {
        if !self.within(scene) {
            return Err(Error::InvalidParameter(format!(
                "box at ({}, {}, {}) of extent {} exceeds scene {}",
                self.corner.x, self.corner.y, self.corner.z, self.extent, scene
            )));
        }
        Ok(())
    }

    /// Intersection with another box, if non-empty
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let a = self.corner_max();
        let b = other.corner_max();
        let min = Point3::new(
            self.corner.x.max(other.corner.x),
            self.corner.y.max(other.corner.y),
            self.corner.z.max(other.corner.z),
        );
        let max = Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        if max.x < min.x || max.y < min.y || max.z < min.z {
            return None;
        }
        BoundingBox::from_corners(min, max).ok()
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let a = self.corner_max();
        let b = other.corner_max();
        let min = Point3::new(
            self.corner.x.min(other.corner.x),
            self.corner.y.min(other.corner.y),
            self.corner.z.min(other.corner.z),
        );
        let max = Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        // min <= max always holds here
        BoundingBox::from_corners(min, max).unwrap_or(*self)
    }

    /// Grow the box by `margin` voxels on each side, clipped to a scene.
    ///
    /// When `grow_z` is false the box keeps its z range.
    pub fn grow(&self, margin: u32, grow_z: bool, scene: Extent) -> BoundingBox {
        let m = margin as i32;
        let mz = if grow_z { m } else { 0 };
        let max = self.corner_max();
        let lo = Point3::new(
            (self.corner.x - m).max(0),
            (self.corner.y - m).max(0),
            (self.corner.z - mz).max(0),
        );
        let hi = Point3::new(
            (max.x + m).min(scene.x() as i32 - 1),
            (max.y + m).min(scene.y() as i32 - 1),
            (max.z + mz).min(scene.z() as i32 - 1),
        );
        BoundingBox::from_corners(lo, hi).unwrap_or(*self)
    }

    /// Iterate over every global point in the box, x fastest
    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        let c = self.corner;
        let e = self.extent;
        (0..e.z() as i32).flat_map(move |z| {
            (0..e.y() as i32).flat_map(move |y| {
                (0..e.x() as i32).map(move |x| Point3::new(c.x + x, c.y + y, c.z + z))
            })
        })
    }
}
