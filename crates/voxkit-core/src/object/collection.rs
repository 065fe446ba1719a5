//! Ordered collections of objects

use super::ObjectMask;
use crate::error::Result;
use crate::{Extent, Mask};

/// An ordered list of object masks.
///
/// Order matters: kernels that paint per-object results let the earlier
/// object win where objects overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectCollection {
    objects: Vec<ObjectMask>,
}

impl ObjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: ObjectMask) {
        self.objects.push(object);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ObjectMask> {
        self.objects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObjectMask> {
        self.objects.iter()
    }

    /// Total number of on voxels across all objects
    pub fn total_voxels(&self) -> usize {
        self.objects.iter().map(ObjectMask::count).sum()
    }

    /// Union of all objects as a scene-sized mask
    ///
    /// # Errors
    ///
    /// Returns an error if any object box lies outside `scene`.
    pub fn to_mask(&self, scene: Extent) -> Result<Mask> {
        let mut mask = Mask::new(scene);
        for object in &self.objects {
            object.bbox().check_within(scene)?;
            for p in object.iter_global() {
                mask.set(p.x as u32, p.y as u32, p.z as u32, true);
            }
        }
        Ok(mask)
    }
}

impl FromIterator<ObjectMask> for ObjectCollection {
    fn from_iter<I: IntoIterator<Item = ObjectMask>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ObjectCollection {
    type Item = ObjectMask;
    type IntoIter = std::vec::IntoIter<ObjectMask>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectCollection {
    type Item = &'a ObjectMask;
    type IntoIter = std::slice::Iter<'a, ObjectMask>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
