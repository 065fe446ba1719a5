//! Neighborhoods for voxel morphology
//!
//! A neighborhood is the set of offsets, relative to a voxel, that are
//! inspected by one morphological pass. The voxel itself is never part of
//! its own neighborhood.

use voxkit_core::Point3;

/// Set of neighbor offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    offsets: Vec<Point3>,
    name: &'static str,
}

impl Neighborhood {
    /// 4-connected in-plane neighborhood
    pub fn small_2d() -> Self {
        Self {
            offsets: vec![
                Point3::new(-1, 0, 0),
                Point3::new(1, 0, 0),
                Point3::new(0, -1, 0),
                Point3::new(0, 1, 0),
            ],
            name: "4-connected",
        }
    }

    /// 8-connected in-plane neighborhood
    pub fn big_2d() -> Self {
        Self {
            offsets: Self::cube_offsets(false),
            name: "8-connected",
        }
    }

    /// 6-connected (face) neighborhood
    pub fn small_3d() -> Self {
        let mut offsets = Self::small_2d().offsets;
        offsets.push(Point3::new(0, 0, -1));
        offsets.push(Point3::new(0, 0, 1));
        Self {
            offsets,
            name: "6-connected",
        }
    }

    /// 26-connected neighborhood
    pub fn big_3d() -> Self {
        Self {
            offsets: Self::cube_offsets(true),
            name: "26-connected",
        }
    }

    /// The z-predecessor and z-successor only
    pub fn z_only() -> Self {
        Self {
            offsets: vec![Point3::new(0, 0, -1), Point3::new(0, 0, 1)],
            name: "z-only",
        }
    }

    /// Neighborhood for a combination of morphology flags.
    ///
    /// `z_only` takes precedence; callers validate that it is only
    /// requested together with `do_3d`.
    pub fn select(do_3d: bool, big: bool, z_only: bool) -> Self {
        match (z_only, do_3d, big) {
            (true, _, _) => Self::z_only(),
            (false, true, true) => Self::big_3d(),
            (false, true, false) => Self::small_3d(),
            (false, false, true) => Self::big_2d(),
            (false, false, false) => Self::small_2d(),
        }
    }

    fn cube_offsets(with_z: bool) -> Vec<Point3> {
        let zs: &[i32] = if with_z { &[-1, 0, 1] } else { &[0] };
        let mut offsets = Vec::with_capacity(26);
        for &dz in zs {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if (dx, dy, dz) != (0, 0, 0) {
                        offsets.push(Point3::new(dx, dy, dz));
                    }
                }
            }
        }
        offsets
    }

    /// Offsets relative to the center voxel
    #[inline]
    pub fn offsets(&self) -> &[Point3] {
        &self.offsets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether any offset leaves the plane
    pub fn spans_z(&self) -> bool {
        self.offsets.iter().any(|p| p.z != 0)
    }
}
