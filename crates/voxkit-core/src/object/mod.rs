//! ObjectMask - a binary object positioned inside a larger scene
//!
//! An object stores only the voxels of its bounding box. Local coordinates
//! run from 0 inside the box; global coordinates are local plus the box
//! corner.

mod collection;

pub use collection::ObjectCollection;

use crate::error::{Error, Result};
use crate::{BinaryValuesByte, BoundingBox, Extent, Mask, Point3, Voxels};

/// A binary object: a bounding box plus a local on/off voxel grid
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMask {
    bbox: BoundingBox,
    voxels: Voxels<u8>,
    binary_values: BinaryValuesByte,
}

impl ObjectMask {
    /// Create an empty (all-off) object covering `bbox`
    pub fn new(bbox: BoundingBox) -> Self {
        let binary_values = BinaryValuesByte::default();
        Self {
            bbox,
            voxels: Voxels::filled(bbox.extent(), binary_values.off()),
            binary_values,
        }
    }

    /// Create an object from a local grid
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the grid extent differs from
    /// the box extent and [`Error::NotBinary`] for stray values.
    pub fn from_voxels(
        bbox: BoundingBox,
        voxels: Voxels<u8>,
        binary_values: BinaryValuesByte,
    ) -> Result<Self> {
        let mask = Mask::from_voxels(voxels, binary_values)?;
        Self::from_local_mask(bbox, mask)
    }

    /// Create an object from a mask whose extent equals the box extent
    pub fn from_local_mask(bbox: BoundingBox, mask: Mask) -> Result<Self> {
        bbox.extent().check_equal(mask.extent())?;
        let binary_values = mask.binary_values();
        Ok(Self {
            bbox,
            voxels: mask.into_voxels(),
            binary_values,
        })
    }

    /// Object covering exactly the on voxels of a scene-sized mask.
    ///
    /// The box is the tightest box around the on voxels. Returns `None` if
    /// the mask has no on voxels.
    pub fn from_mask(mask: &Mask) -> Option<ObjectMask> {
        let extent = mask.extent();
        let mut bounds: Option<(Point3, Point3)> = None;
        for z in 0..extent.z() {
            for y in 0..extent.y() {
                for x in 0..extent.x() {
                    if !mask.is_on(x, y, z) {
                        continue;
                    }
                    let p = Point3::new(x as i32, y as i32, z as i32);
                    bounds = Some(match bounds {
                        None => (p, p),
                        Some((lo, hi)) => (
                            Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                            Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
                        ),
                    });
                }
            }
        }
        let (lo, hi) = bounds?;
        let bbox = BoundingBox::from_corners(lo, hi).ok()?;
        let mut object = ObjectMask::new(bbox);
        for p in bbox.points() {
            if mask.is_on(p.x as u32, p.y as u32, p.z as u32) {
                object.set_local(p - lo, true);
            }
        }
        Some(object)
    }

    #[inline]
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.bbox.extent()
    }

    #[inline]
    pub fn binary_values(&self) -> BinaryValuesByte {
        self.binary_values
    }

    /// Local byte grid
    #[inline]
    pub fn voxels(&self) -> &Voxels<u8> {
        &self.voxels
    }

    /// Whether a local voxel is on
    #[inline]
    pub fn is_on_local(&self, x: u32, y: u32, z: u32) -> bool {
        self.binary_values.is_on(self.voxels.get(x, y, z))
    }

    /// Whether a global point belongs to the object
    pub fn contains_global(&self, p: Point3) -> bool {
        let local = p - self.bbox.corner();
        self.extent().contains_point(local)
            && self.is_on_local(local.x as u32, local.y as u32, local.z as u32)
    }

    fn set_local(&mut self, local: Point3, on: bool) {
        let v = self.binary_values.value_for(on);
        self.voxels.set(local.x as u32, local.y as u32, local.z as u32, v);
    }

    /// Switch a voxel on or off by global coordinate
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the point is outside the box.
    pub fn set_global(&mut self, p: Point3, on: bool) -> Result<()> {
        if !self.bbox.contains(p) {
            return Err(Error::InvalidParameter(format!(
                "point ({}, {}, {}) is outside the object box",
                p.x, p.y, p.z
            )));
        }
        self.set_local(p - self.bbox.corner(), on);
        Ok(())
    }

    /// Number of on voxels
    pub fn count(&self) -> usize {
        let on = self.binary_values.on();
        self.voxels.count_where(|v| v == on)
    }

    /// Global coordinates of every on voxel, x fastest
    pub fn iter_global(&self) -> impl Iterator<Item = Point3> + '_ {
        let corner = self.bbox.corner();
        self.bbox.points().filter(move |&p| {
            let l = p - corner;
            self.is_on_local(l.x as u32, l.y as u32, l.z as u32)
        })
    }

    /// Copy of the object with its box grown by `margin` on every side,
    /// clipped to `scene`. The on voxels are unchanged; only the box (and
    /// the off border around them) grows.
    pub fn grow_bbox(&self, margin: u32, grow_z: bool, scene: Extent) -> ObjectMask {
        let bbox = self.bbox.grow(margin, grow_z, scene);
        let mut grown = ObjectMask {
            bbox,
            voxels: Voxels::filled(bbox.extent(), self.binary_values.off()),
            binary_values: self.binary_values,
        };
        let shift = self.bbox.corner() - bbox.corner();
        let e = self.extent();
        for z in 0..e.z() {
            for y in 0..e.y() {
                for x in 0..e.x() {
                    if self.is_on_local(x, y, z) {
                        let l = Point3::new(x as i32, y as i32, z as i32) + shift;
                        grown.set_local(l, true);
                    }
                }
            }
        }
        grown
    }

    /// Local grid as a mask (extent = box extent)
    pub fn as_local_mask(&self) -> Mask {
        Mask::from_fn(self.extent(), self.binary_values, |x, y, z| {
            self.is_on_local(x, y, z)
        })
    }

    /// Paint the object into a scene-sized mask
    ///
    /// # Errors
    ///
    /// Returns an error if the box is not inside `scene`.
    pub fn to_scene_mask(&self, scene: Extent) -> Result<Mask> {
        self.bbox.check_within(scene)?;
        let mut mask = Mask::new(scene);
        for p in self.iter_global() {
            mask.set(p.x as u32, p.y as u32, p.z as u32, true);
        }
        Ok(mask)
    }
}
