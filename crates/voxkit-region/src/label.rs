//! Label images
//!
//! A label image stores 0 for background and `i + 1` at the voxels of
//! object `i`.

use crate::{RegionError, RegionResult};
use std::collections::BTreeMap;
use voxkit_core::{BoundingBox, Extent, ObjectCollection, ObjectMask, Point3, Voxels};

/// Paint a collection into a 16-bit label image.
///
/// Where objects overlap, the earlier object keeps its label.
///
/// # Errors
///
/// Returns [`RegionError::Misconfigured`] for more than 65535 objects and a
/// core error if an object box lies outside `extent`.
pub fn label_objects(objects: &ObjectCollection, extent: Extent) -> RegionResult<Voxels<u16>> {
    if objects.len() > u16::MAX as usize {
        return Err(RegionError::Misconfigured(format!(
            "{} objects do not fit a 16-bit label image",
            objects.len()
        )));
    }
    for object in objects {
        object.bbox().check_within(extent)?;
    }
    log::debug!("label objects: {} objects, extent={extent}", objects.len());

    let mut labels: Voxels<u16> = Voxels::new(extent);
    for (i, object) in objects.iter().enumerate() {
        let label = (i + 1) as u16;
        for p in object.iter_global() {
            let (x, y, z) = (p.x as u32, p.y as u32, p.z as u32);
            if labels.get(x, y, z) == 0 {
                labels.set(x, y, z, label);
            }
        }
    }
    Ok(labels)
}

/// Recover one object per distinct non-zero label, in ascending label order
pub fn objects_from_labels(labels: &Voxels<u16>) -> RegionResult<ObjectCollection> {
    let extent = labels.extent();
    let mut bounds: BTreeMap<u16, (Point3, Point3)> = BTreeMap::new();
    for z in 0..extent.z() {
        for y in 0..extent.y() {
            for x in 0..extent.x() {
                let label = labels.get(x, y, z);
                if label == 0 {
                    continue;
                }
                let p = Point3::new(x as i32, y as i32, z as i32);
                bounds
                    .entry(label)
                    .and_modify(|(lo, hi)| {
                        *lo = Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z));
                        *hi = Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z));
                    })
                    .or_insert((p, p));
            }
        }
    }

    let mut objects = ObjectCollection::new();
    for (label, (lo, hi)) in bounds {
        let bbox = BoundingBox::from_corners(lo, hi)?;
        let mut object = ObjectMask::new(bbox);
        for p in bbox.points() {
            if labels.get(p.x as u32, p.y as u32, p.z as u32) == label {
                object.set_global(p, true)?;
            }
        }
        objects.push(object);
    }
    log::debug!("objects from labels: {} objects", objects.len());
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lo: (i32, i32), hi: (i32, i32)) -> ObjectMask {
        let bbox =
            BoundingBox::from_corners(Point3::new(lo.0, lo.1, 0), Point3::new(hi.0, hi.1, 0))
                .unwrap();
        let mut object = ObjectMask::new(bbox);
        for p in bbox.points() {
            object.set_global(p, true).unwrap();
        }
        object
    }

    #[test]
    fn test_first_object_wins() {
        let extent = Extent::new(6, 6, 1).unwrap();
        let objects: ObjectCollection = [square((0, 0), (3, 3)), square((2, 2), (5, 5))]
            .into_iter()
            .collect();
        let labels = label_objects(&objects, extent).unwrap();
        assert_eq!(labels.get(0, 0, 0), 1);
        assert_eq!(labels.get(3, 3, 0), 1);
        assert_eq!(labels.get(4, 4, 0), 2);
        assert_eq!(labels.count_where(|v| v == 2), 16 - 4);
        assert_eq!(labels.count_where(|v| v == 0), 36 - 16 - 12);
    }

    #[test]
    fn test_object_outside_scene() {
        let objects: ObjectCollection = [square((3, 3), (7, 7))].into_iter().collect();
        let extent = Extent::new(6, 6, 1).unwrap();
        assert!(matches!(label_objects(&objects, extent), Err(RegionError::Core(_))));
    }

    #[test]
    fn test_labels_round_trip() {
        let extent = Extent::new(8, 4, 1).unwrap();
        let objects: ObjectCollection = [square((0, 0), (1, 3)), square((4, 1), (6, 2))]
            .into_iter()
            .collect();
        let labels = label_objects(&objects, extent).unwrap();
        let back = objects_from_labels(&labels).unwrap();
        assert_eq!(back, objects);
    }
}
