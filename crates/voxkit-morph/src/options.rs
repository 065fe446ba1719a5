//! Option records for dilation and erosion

use crate::{MorphError, MorphResult, Neighborhood};
use voxkit_core::{Extent, Voxels};

/// Parameters for [`dilate`](crate::dilate)
#[derive(Debug, Clone, Copy)]
pub struct DilateOptions<'a> {
    /// Use a 3D neighborhood; when false each z-plane is processed alone
    pub do_3d: bool,
    /// Number of passes, at least 1
    pub iterations: u32,
    /// 8/26-connected instead of 4/6-connected
    pub big_neighborhood: bool,
    /// Grow along z only (requires `do_3d`)
    pub z_only: bool,
    /// Intensity image gating the neighbor test
    pub background: Option<&'a Voxels<u8>>,
    /// Neighbors darker than this in `background` are ignored; 0 disables gating
    pub min_intensity: u8,
}

impl Default for DilateOptions<'_> {
    fn default() -> Self {
        Self {
            do_3d: false,
            iterations: 1,
            big_neighborhood: false,
            z_only: false,
            background: None,
            min_intensity: 0,
        }
    }
}

impl<'a> DilateOptions<'a> {
    /// Check the options against the extent of the mask they will run on
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::Misconfigured`] for zero iterations, `z_only`
    /// without `do_3d`, or gating without a background image, and
    /// a dimension mismatch if the background extent differs.
    pub fn validate(&self, extent: Extent) -> MorphResult<()> {
        if self.z_only && !self.do_3d {
            return Err(MorphError::Misconfigured("z_only dilation requires do_3d".into()));
        }
        validate_common(self.iterations, self.background, self.min_intensity, extent)
    }

    pub fn neighborhood(&self) -> Neighborhood {
        Neighborhood::select(self.do_3d, self.big_neighborhood, self.z_only)
    }

    pub(crate) fn gate(&self) -> Option<IntensityGate<'a>> {
        IntensityGate::new(self.background, self.min_intensity)
    }
}

/// Parameters for [`erode`](crate::erode)
#[derive(Debug, Clone, Copy)]
pub struct ErodeOptions<'a> {
    /// Use a 3D neighborhood; when false each z-plane is processed alone
    pub do_3d: bool,
    /// Number of passes, at least 1
    pub iterations: u32,
    /// 8/26-connected instead of 4/6-connected
    pub big_neighborhood: bool,
    /// Intensity image gating the neighbor test
    pub background: Option<&'a Voxels<u8>>,
    /// Neighbors darker than this in `background` are ignored; 0 disables gating
    pub min_intensity: u8,
    /// Treat voxels beyond the border as on, so the border does not erode
    pub outside_at_threshold: bool,
}

impl Default for ErodeOptions<'_> {
    fn default() -> Self {
        Self {
            do_3d: false,
            iterations: 1,
            big_neighborhood: false,
            background: None,
            min_intensity: 0,
            outside_at_threshold: false,
        }
    }
}

impl<'a> ErodeOptions<'a> {
    /// Check the options against the extent of the mask they will run on
    pub fn validate(&self, extent: Extent) -> MorphResult<()> {
        validate_common(self.iterations, self.background, self.min_intensity, extent)
    }

    pub fn neighborhood(&self) -> Neighborhood {
        Neighborhood::select(self.do_3d, self.big_neighborhood, false)
    }

    pub(crate) fn gate(&self) -> Option<IntensityGate<'a>> {
        IntensityGate::new(self.background, self.min_intensity)
    }

    /// Dilation with the same neighborhood and gating
    pub fn to_dilate(&self) -> DilateOptions<'a> {
        DilateOptions {
            do_3d: self.do_3d,
            iterations: self.iterations,
            big_neighborhood: self.big_neighborhood,
            z_only: false,
            background: self.background,
            min_intensity: self.min_intensity,
        }
    }
}

fn validate_common(
    iterations: u32,
    background: Option<&Voxels<u8>>,
    min_intensity: u8,
    extent: Extent,
) -> MorphResult<()> {
    if iterations == 0 {
        return Err(MorphError::Misconfigured("iterations must be at least 1".into()));
    }
    match background {
        Some(bg) => extent.check_equal(bg.extent())?,
        None if min_intensity > 0 => {
            return Err(MorphError::Misconfigured(format!(
                "min_intensity {min_intensity} requires a background image"
            )));
        }
        None => {}
    }
    Ok(())
}

/// Excludes neighbors whose background intensity is below a minimum
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntensityGate<'a> {
    background: &'a Voxels<u8>,
    min_intensity: u8,
}

impl<'a> IntensityGate<'a> {
    fn new(background: Option<&'a Voxels<u8>>, min_intensity: u8) -> Option<Self> {
        match background {
            Some(background) if min_intensity > 0 => Some(Self {
                background,
                min_intensity,
            }),
            _ => None,
        }
    }

    /// Whether the neighbor at (x, y, z) takes part in the test
    #[inline]
    pub(crate) fn admits(&self, x: u32, y: u32, z: u32) -> bool {
        self.background.get(x, y, z) >= self.min_intensity
    }
}
