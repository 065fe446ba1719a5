//! Connected component analysis
//!
//! Components are found with a two-pass scan backed by a Union-Find
//! (disjoint set) structure. The first pass gives every on voxel a
//! provisional label, merging labels whenever an already scanned neighbor
//! is on. The second pass resolves each label to its set root.

use crate::RegionResult;
use voxkit_core::{BoundingBox, Mask, ObjectCollection, ObjectMask, Point3};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Face-adjacent neighbors only (4 in 2D, 6 in 3D)
    #[default]
    Face,
    /// Every touching neighbor, diagonals included (8 in 2D, 26 in 3D)
    Full,
}

impl Connectivity {
    /// Neighbor offsets that precede a voxel in scan order (z, y, x)
    fn backward_offsets(self, do_3d: bool) -> Vec<Point3> {
        let dz_range = if do_3d { -1i32..=1 } else { 0i32..=0 };
        let mut offsets = Vec::new();
        for dz in dz_range {
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let precedes = dz < 0 || (dz == 0 && (dy < 0 || (dy == 0 && dx < 0)));
                    let steps = dx.abs() + dy.abs() + dz.abs();
                    let adjacent = match self {
                        Connectivity::Face => steps == 1,
                        Connectivity::Full => steps >= 1,
                    };
                    if precedes && adjacent {
                        offsets.push(Point3::new(dx, dy, dz));
                    }
                }
            }
        }
        offsets
    }
}

/// Disjoint set over provisional labels; the root of a set is its
/// smallest label
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // Label 0 is background
        Self { parent: vec![0] }
    }

    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut label: u32) -> u32 {
        while self.parent[label as usize] != label {
            let grandparent = self.parent[self.parent[label as usize] as usize];
            self.parent[label as usize] = grandparent;
            label = grandparent;
        }
        label
    }

    fn union(&mut self, a: u32, b: u32) -> u32 {
        let (ra, rb) = (self.find(a), self.find(b));
        let (root, child) = if ra <= rb { (ra, rb) } else { (rb, ra) };
        self.parent[child as usize] = root;
        root
    }
}

/// Voxel count and inclusive bounds of one component
struct Component {
    count: usize,
    lo: Point3,
    hi: Point3,
}

impl Component {
    fn new(p: Point3) -> Self {
        Self {
            count: 1,
            lo: p,
            hi: p,
        }
    }

    fn add(&mut self, p: Point3) {
        self.count += 1;
        self.lo = Point3::new(self.lo.x.min(p.x), self.lo.y.min(p.y), self.lo.z.min(p.z));
        self.hi = Point3::new(self.hi.x.max(p.x), self.hi.y.max(p.y), self.hi.z.max(p.z));
    }
}

/// Find all connected components of the on voxels of a mask.
///
/// Objects are returned in the order their first voxel is met when
/// scanning z, then y, then x. Each object's box is the tightest box around
/// its voxels.
///
/// # Arguments
///
/// * `mask` - Scene-sized binary mask
/// * `connectivity` - Which neighbors join a component
/// * `do_3d` - Join components across z-planes; when false each plane is
///   segmented alone
/// * `min_voxels` - Components with fewer voxels are dropped
pub fn find_connected_components(
    mask: &Mask,
    connectivity: Connectivity,
    do_3d: bool,
    min_voxels: usize,
) -> RegionResult<ObjectCollection> {
    let extent = mask.extent();
    let offsets = connectivity.backward_offsets(do_3d);
    log::debug!(
        "connected components: extent={extent} connectivity={connectivity:?} do_3d={do_3d} \
         min_voxels={min_voxels}"
    );

    let w = extent.x() as usize;
    let plane_len = extent.volume_xy();
    let index = |p: Point3| p.z as usize * plane_len + p.y as usize * w + p.x as usize;
    let point_at = |i: usize| {
        Point3::new((i % w) as i32, ((i % plane_len) / w) as i32, (i / plane_len) as i32)
    };

    // First pass: provisional labels
    let mut labels = vec![0u32; extent.volume()];
    let mut sets = UnionFind::new();
    for z in 0..extent.z() {
        for y in 0..extent.y() {
            for x in 0..extent.x() {
                if !mask.is_on(x, y, z) {
                    continue;
                }
                let p = Point3::new(x as i32, y as i32, z as i32);
                let mut label = 0;
                for &d in &offsets {
                    let q = p + d;
                    if !extent.contains_point(q) {
                        continue;
                    }
                    let neighbor = labels[index(q)];
                    if neighbor == 0 {
                        continue;
                    }
                    label = if label == 0 {
                        sets.find(neighbor)
                    } else {
                        sets.union(label, neighbor)
                    };
                }
                if label == 0 {
                    label = sets.make_set();
                }
                labels[index(p)] = label;
            }
        }
    }
    log::trace!("connected components: {} provisional labels", sets.parent.len() - 1);

    // Second pass: resolve roots, numbering components by first appearance
    let mut slot_of_root = vec![usize::MAX; sets.parent.len()];
    let mut components: Vec<Component> = Vec::new();
    let mut slots = vec![usize::MAX; labels.len()];
    for (i, &label) in labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        let root = sets.find(label) as usize;
        let p = point_at(i);
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = components.len();
            components.push(Component::new(p));
        } else {
            components[slot_of_root[root]].add(p);
        }
        slots[i] = slot_of_root[root];
    }

    let mut objects: Vec<Option<ObjectMask>> = Vec::with_capacity(components.len());
    for c in &components {
        objects.push(if c.count >= min_voxels {
            Some(ObjectMask::new(BoundingBox::from_corners(c.lo, c.hi)?))
        } else {
            None
        });
    }
    for (i, &slot) in slots.iter().enumerate() {
        if slot == usize::MAX {
            continue;
        }
        if let Some(object) = objects[slot].as_mut() {
            object.set_global(point_at(i), true)?;
        }
    }

    let found: ObjectCollection = objects.into_iter().flatten().collect();
    log::debug!("connected components: {} found, {} kept", components.len(), found.len());
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxkit_core::Extent;

    fn mask_from_rows(rows: &[&str]) -> Mask {
        let extent = Extent::new(rows[0].len() as u32, rows.len() as u32, 1).unwrap();
        let mut mask = Mask::new(extent);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    mask.set(x as u32, y as u32, 0, true);
                }
            }
        }
        mask
    }

    #[test]
    fn test_backward_offsets() {
        assert_eq!(Connectivity::Face.backward_offsets(false).len(), 2);
        assert_eq!(Connectivity::Full.backward_offsets(false).len(), 4);
        assert_eq!(Connectivity::Face.backward_offsets(true).len(), 3);
        assert_eq!(Connectivity::Full.backward_offsets(true).len(), 13);
        assert_eq!(
            Connectivity::Face.backward_offsets(false),
            vec![Point3::new(0, -1, 0), Point3::new(-1, 0, 0)]
        );
        assert_eq!(
            Connectivity::Face.backward_offsets(true),
            vec![Point3::new(0, 0, -1), Point3::new(0, -1, 0), Point3::new(-1, 0, 0)]
        );
    }

    #[test]
    fn test_diagonal_depends_on_connectivity() {
        let mask = mask_from_rows(&["#...", ".#..", "....", "...#"]);
        let face = find_connected_components(&mask, Connectivity::Face, false, 1).unwrap();
        assert_eq!(face.len(), 3);
        let full = find_connected_components(&mask, Connectivity::Full, false, 1).unwrap();
        assert_eq!(full.len(), 2);
        assert_eq!(full.get(0).unwrap().count(), 2);
    }

    #[test]
    fn test_u_shape_merges() {
        // Two arms meet only at the bottom row, after both got labels
        let mask = mask_from_rows(&["#...#", "#...#", "#####"]);
        let objects = find_connected_components(&mask, Connectivity::Face, false, 1).unwrap();
        assert_eq!(objects.len(), 1);
        let o = objects.get(0).unwrap();
        assert_eq!(o.count(), 9);
        assert_eq!(o.bbox().extent(), Extent::new(5, 3, 1).unwrap());
    }

    #[test]
    fn test_scan_order_and_min_voxels() {
        let mask = mask_from_rows(&["..##", "#...", "#..."]);
        let objects = find_connected_components(&mask, Connectivity::Face, false, 1).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects.get(0).unwrap().bbox().corner(), Point3::new(2, 0, 0));
        assert_eq!(objects.get(1).unwrap().bbox().corner(), Point3::new(0, 1, 0));

        let big = find_connected_components(&mask, Connectivity::Face, false, 3).unwrap();
        assert!(big.is_empty());
    }

    #[test]
    fn test_planes_join_only_in_3d() {
        let extent = Extent::new(3, 3, 2).unwrap();
        let mut mask = Mask::new(extent);
        mask.set(1, 1, 0, true);
        mask.set(1, 1, 1, true);
        let flat = find_connected_components(&mask, Connectivity::Face, false, 1).unwrap();
        assert_eq!(flat.len(), 2);
        let solid = find_connected_components(&mask, Connectivity::Face, true, 1).unwrap();
        assert_eq!(solid.len(), 1);
        assert_eq!(solid.get(0).unwrap().bbox().extent(), Extent::new(1, 1, 2).unwrap());
    }

    #[test]
    fn test_empty_mask() {
        let mask = Mask::new(Extent::new(4, 4, 1).unwrap());
        let objects = find_connected_components(&mask, Connectivity::Full, true, 0).unwrap();
        assert!(objects.is_empty());
    }
}
