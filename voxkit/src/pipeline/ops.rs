//! Step configuration records
//!
//! Every kernel is reachable through one variant of [`ChannelOp`] (steps
//! reading a channel) or [`MaskOp`] (steps reading a mask). Both are
//! internally tagged by an `"op"` field, so a step reads naturally in JSON:
//!
//! ```json
//! { "input": "nuclei", "mutation": "in_place",
//!   "op": { "op": "dilate", "iterations": 2, "do_3d": true } }
//! ```

use super::{Context, Entry, PipelineError, PipelineResult};
use serde::Deserialize;
use voxkit_core::{
    ArithOp, BinaryValuesByte, Channel, ChannelData, Error as CoreError, Histogram, Mask,
    VoxelKind, VoxelType, Voxels,
};
use voxkit_filter::{GradientAxis, gradient, gradient_u16, mean_filter_2d, median_filter_2d};
use voxkit_morph::{DilateOptions, ErodeOptions, close, dilate, erode, open, outline};
use voxkit_region::{Connectivity, find_connected_components};
use voxkit_threshold::{self as threshold, LevelCalculator};

/// Run `$body` with `$v` bound to the voxels of an integer channel
macro_rules! with_integer {
    ($channel:expr, $v:ident => $body:expr) => {
        match $channel.data() {
            ChannelData::U8($v) => $body,
            ChannelData::U16($v) => $body,
            ChannelData::F32(_) => {
                return Err(CoreError::UnsupportedVoxelKind(VoxelKind::F32.name()).into());
            }
        }
    };
}

/// Run `$body` with `$v` bound to the voxels of any channel
macro_rules! with_any {
    ($channel:expr, $v:ident => $body:expr) => {
        match $channel.data() {
            ChannelData::U8($v) => $body,
            ChannelData::U16($v) => $body,
            ChannelData::F32($v) => $body,
        }
    };
}

/// Run `$body` over two channels of the same voxel kind
macro_rules! with_pair {
    ($a:expr, $b:expr, $va:ident, $vb:ident => $body:expr) => {
        match ($a.data(), $b.data()) {
            (ChannelData::U8($va), ChannelData::U8($vb)) => $body,
            (ChannelData::U16($va), ChannelData::U16($vb)) => $body,
            (ChannelData::F32($va), ChannelData::F32($vb)) => $body,
            (_, other) => {
                return Err(CoreError::UnsupportedVoxelKind(other.kind().name()).into());
            }
        }
    };
}

/// Where a step's result is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// Overwrite the input entry
    InPlace,
    /// Store under the step's `output` name, leaving the input untouched
    AllocateNew,
}

/// Level calculator selection
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LevelMethod {
    Otsu,
    Mean,
    Constant { level: u32 },
    Quantile { quantile: f64 },
    MeanPlusStdDev { factor: f64 },
}

impl LevelMethod {
    pub fn calculator(&self) -> Box<dyn LevelCalculator> {
        match *self {
            LevelMethod::Otsu => Box::new(threshold::Otsu),
            LevelMethod::Mean => Box::new(threshold::MeanLevel),
            LevelMethod::Constant { level } => Box::new(threshold::ConstantLevel(level)),
            LevelMethod::Quantile { quantile } => Box::new(threshold::QuantileLevel { quantile }),
            LevelMethod::MeanPlusStdDev { factor } => {
                Box::new(threshold::MeanPlusStdDev { factor })
            }
        }
    }

    fn validate(&self) -> PipelineResult<()> {
        let checked = match *self {
            LevelMethod::Quantile { quantile } => threshold::QuantileLevel { quantile }.validate(),
            LevelMethod::MeanPlusStdDev { factor } => {
                threshold::MeanPlusStdDev { factor }.validate()
            }
            _ => Ok(()),
        };
        checked.map_err(|e| match e {
            threshold::ThresholdError::Misconfigured(msg) => PipelineError::Misconfigured(msg),
            other => other.into(),
        })
    }
}

/// Two-channel voxel-wise operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineOp {
    Add,
    Subtract,
    AbsDiff,
    Min,
    Max,
}

impl From<CombineOp> for ArithOp {
    fn from(op: CombineOp) -> Self {
        match op {
            CombineOp::Add => ArithOp::Add,
            CombineOp::Subtract => ArithOp::Subtract,
            CombineOp::AbsDiff => ArithOp::AbsDiff,
            CombineOp::Min => ArithOp::Min,
            CombineOp::Max => ArithOp::Max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
    Magnitude2d,
    Magnitude3d,
}

impl From<Axis> for GradientAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => GradientAxis::X,
            Axis::Y => GradientAxis::Y,
            Axis::Z => GradientAxis::Z,
            Axis::Magnitude2d => GradientAxis::Magnitude2d,
            Axis::Magnitude3d => GradientAxis::Magnitude3d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityConfig {
    #[default]
    Face,
    Full,
}

impl From<ConnectivityConfig> for Connectivity {
    fn from(c: ConnectivityConfig) -> Self {
        match c {
            ConnectivityConfig::Face => Connectivity::Face,
            ConnectivityConfig::Full => Connectivity::Full,
        }
    }
}

fn unit_scale() -> f64 {
    1.0
}

fn one() -> usize {
    1
}

/// Steps whose input is a channel
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChannelOp {
    Invert,
    AddConstant {
        value: f64,
    },
    MultiplyConstant {
        factor: f64,
    },
    SubtractFromConstant {
        value: f64,
    },
    MaxWithConstant {
        value: f64,
    },
    MinWithConstant {
        value: f64,
    },
    ZScore {
        factor: f64,
    },
    /// Voxel-wise combination with a second channel of the same kind
    Combine {
        other: String,
        arith: CombineOp,
    },
    /// Set every voxel under `mask` to `value`
    AssignUnderMask {
        mask: String,
        value: f64,
    },
    /// Take voxels under `mask` from `source`, a channel of the same kind
    CopyUnderMask {
        source: String,
        mask: String,
    },
    MeanFilter {
        radius: u32,
        #[serde(default)]
        input_mask: Option<String>,
        #[serde(default)]
        output_mask: Option<String>,
    },
    MedianFilter {
        half_width: u32,
    },
    /// f32 output, or u16 with the sign kept when `offset` is given
    Gradient {
        axis: Axis,
        #[serde(default = "unit_scale")]
        scale: f64,
        #[serde(default)]
        offset: Option<f64>,
    },
    Threshold {
        level: u32,
    },
    ThresholdAuto {
        method: LevelMethod,
        #[serde(default)]
        restrict_to: Option<String>,
    },
    LevelPerObject {
        objects: String,
        method: LevelMethod,
        #[serde(default)]
        num_dilations: u32,
        #[serde(default)]
        do_3d: bool,
    },
    ThresholdPerObject {
        objects: String,
        method: LevelMethod,
        #[serde(default)]
        num_dilations: u32,
        #[serde(default)]
        do_3d: bool,
    },
    ComponentScore {
        objects: String,
        method: LevelMethod,
        tolerance: u32,
        #[serde(default)]
        num_dilations: u32,
    },
}

impl ChannelOp {
    /// Kind of context entry the step produces
    pub fn output_kind(&self) -> &'static str {
        match self {
            ChannelOp::Threshold { .. }
            | ChannelOp::ThresholdAuto { .. }
            | ChannelOp::ThresholdPerObject { .. } => "mask",
            _ => "channel",
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        match self {
            ChannelOp::Gradient { scale, offset, .. } => {
                if !scale.is_finite() || offset.is_some_and(|o| !o.is_finite()) {
                    return Err(PipelineError::Misconfigured(
                        "gradient scale and offset must be finite".into(),
                    ));
                }
            }
            ChannelOp::ThresholdAuto { method, .. }
            | ChannelOp::LevelPerObject { method, .. }
            | ChannelOp::ThresholdPerObject { method, .. }
            | ChannelOp::ComponentScore { method, .. } => method.validate()?,
            _ => {}
        }
        Ok(())
    }

    pub fn run(&self, input: &Channel, ctx: &Context) -> PipelineResult<Entry> {
        let resolution = input.resolution();
        let channel = |data: ChannelData| -> Entry {
            Channel::from_data(data).with_resolution(resolution).into()
        };
        let mask = |m: Mask| -> Entry { m.with_resolution(resolution).into() };
        let bv = BinaryValuesByte::default();

        let entry = match self {
            ChannelOp::Invert => channel(with_any!(input, v => v.invert()?.into())),
            ChannelOp::AddConstant { value } => {
                channel(with_any!(input, v => v.add_constant(*value).into()))
            }
            ChannelOp::MultiplyConstant { factor } => {
                channel(with_any!(input, v => v.multiply_constant(*factor)?.into()))
            }
            ChannelOp::SubtractFromConstant { value } => {
                channel(with_any!(input, v => v.subtract_from_constant(*value).into()))
            }
            ChannelOp::MaxWithConstant { value } => {
                channel(with_any!(input, v => v.max_with_constant(*value).into()))
            }
            ChannelOp::MinWithConstant { value } => {
                channel(with_any!(input, v => v.min_with_constant(*value).into()))
            }
            ChannelOp::ZScore { factor } => channel(with_integer!(input, v => {
                v.z_score(&Histogram::from_voxels(v), *factor).into()
            })),
            ChannelOp::Combine { other, arith } => {
                let other = ctx.channel(other)?;
                let op = ArithOp::from(*arith);
                channel(with_pair!(input, other, a, b => a.arith_binary_op(b, op)?.into()))
            }
            ChannelOp::AssignUnderMask { mask: name, value } => {
                let under = ctx.mask(name)?;
                channel(with_any!(input, v => {
                    let mut out = v.clone();
                    out.assign_under_mask(under, VoxelType::from_f64(*value))?;
                    out.into()
                }))
            }
            ChannelOp::CopyUnderMask { source, mask: name } => {
                let source = ctx.channel(source)?;
                let under = ctx.mask(name)?;
                channel(with_pair!(input, source, v, src => {
                    let mut out = v.clone();
                    out.copy_under_mask(src, under)?;
                    out.into()
                }))
            }
            ChannelOp::MeanFilter {
                radius,
                input_mask,
                output_mask,
            } => {
                let input_mask = ctx.optional_mask(input_mask.as_deref())?;
                let output_mask = ctx.optional_mask(output_mask.as_deref())?;
                channel(with_integer!(input, v => {
                    mean_filter_2d(v, *radius, input_mask, output_mask)?.into()
                }))
            }
            ChannelOp::MedianFilter { half_width } => {
                channel(with_integer!(input, v => median_filter_2d(v, *half_width)?.into()))
            }
            ChannelOp::Gradient {
                axis,
                scale,
                offset,
            } => {
                let axis = GradientAxis::from(*axis);
                channel(match offset {
                    None => with_any!(input, v => gradient(v, axis, *scale)?.into()),
                    Some(offset) => {
                        with_any!(input, v => gradient_u16(v, axis, *scale, *offset)?.into())
                    }
                })
            }
            ChannelOp::Threshold { level } => {
                mask(with_any!(input, v => threshold::threshold(v, *level, bv)))
            }
            ChannelOp::ThresholdAuto {
                method,
                restrict_to,
            } => {
                let restrict_to = ctx.optional_mask(restrict_to.as_deref())?;
                let calc = method.calculator();
                mask(with_integer!(input, v => {
                    threshold::threshold_auto(v, calc.as_ref(), restrict_to, bv)?
                }))
            }
            ChannelOp::LevelPerObject {
                objects,
                method,
                num_dilations,
                do_3d,
            } => {
                let objects = ctx.objects(objects)?;
                let calc = method.calculator();
                channel(with_integer!(input, v => {
                    threshold::level_per_object(v, objects, calc.as_ref(), *num_dilations, *do_3d)?
                        .into()
                }))
            }
            ChannelOp::ThresholdPerObject {
                objects,
                method,
                num_dilations,
                do_3d,
            } => {
                let objects = ctx.objects(objects)?;
                let calc = method.calculator();
                mask(with_integer!(input, v => {
                    threshold::threshold_per_object(
                        v,
                        objects,
                        calc.as_ref(),
                        *num_dilations,
                        *do_3d,
                        bv,
                    )?
                }))
            }
            ChannelOp::ComponentScore {
                objects,
                method,
                tolerance,
                num_dilations,
            } => {
                let objects = ctx.objects(objects)?;
                let calc = method.calculator();
                channel(with_integer!(input, v => {
                    threshold::connected_component_score(
                        v,
                        objects,
                        calc.as_ref(),
                        *tolerance,
                        *num_dilations,
                    )?
                    .into()
                }))
            }
        };
        Ok(entry)
    }
}

/// Morphology parameters shared by the mask steps
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub do_3d: bool,
    pub iterations: u32,
    pub big_neighborhood: bool,
    /// Dilation only
    pub z_only: bool,
    /// Name of a u8 channel gating the neighbor test
    pub background: Option<String>,
    pub min_intensity: u8,
    /// Erosion-based steps only
    pub outside_at_threshold: bool,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            do_3d: false,
            iterations: 1,
            big_neighborhood: false,
            z_only: false,
            background: None,
            min_intensity: 0,
            outside_at_threshold: false,
        }
    }
}

impl MorphConfig {
    fn validate(&self, is_dilation: bool) -> PipelineResult<()> {
        let problem = if self.iterations == 0 {
            Some("iterations must be at least 1")
        } else if self.z_only && !is_dilation {
            Some("z_only applies to dilation only")
        } else if self.z_only && !self.do_3d {
            Some("z_only dilation requires do_3d")
        } else if self.outside_at_threshold && is_dilation {
            Some("outside_at_threshold applies to erosion only")
        } else if self.min_intensity > 0 && self.background.is_none() {
            Some("min_intensity requires a background channel")
        } else {
            None
        };
        match problem {
            Some(msg) => Err(PipelineError::Misconfigured(msg.into())),
            None => Ok(()),
        }
    }

    fn background<'a>(&self, ctx: &'a Context) -> PipelineResult<Option<&'a Voxels<u8>>> {
        match &self.background {
            Some(name) => Ok(Some(ctx.channel(name)?.as_u8()?)),
            None => Ok(None),
        }
    }

    fn dilate_options<'a>(&self, background: Option<&'a Voxels<u8>>) -> DilateOptions<'a> {
        DilateOptions {
            do_3d: self.do_3d,
            iterations: self.iterations,
            big_neighborhood: self.big_neighborhood,
            z_only: self.z_only,
            background,
            min_intensity: self.min_intensity,
        }
    }

    fn erode_options<'a>(&self, background: Option<&'a Voxels<u8>>) -> ErodeOptions<'a> {
        ErodeOptions {
            do_3d: self.do_3d,
            iterations: self.iterations,
            big_neighborhood: self.big_neighborhood,
            background,
            min_intensity: self.min_intensity,
            outside_at_threshold: self.outside_at_threshold,
        }
    }
}

/// Steps whose input is a mask
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MaskOp {
    Dilate(MorphConfig),
    Erode(MorphConfig),
    Open(MorphConfig),
    Close(MorphConfig),
    Outline(MorphConfig),
    /// Swap the on and off voxels, keeping the encoding
    InvertMask,
    ConnectedComponents {
        #[serde(default)]
        connectivity: ConnectivityConfig,
        #[serde(default)]
        do_3d: bool,
        #[serde(default = "one")]
        min_voxels: usize,
    },
}

impl MaskOp {
    /// Kind of context entry the step produces
    pub fn output_kind(&self) -> &'static str {
        match self {
            MaskOp::ConnectedComponents { .. } => "object collection",
            _ => "mask",
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        match self {
            MaskOp::Dilate(config) => config.validate(true),
            MaskOp::Erode(config)
            | MaskOp::Open(config)
            | MaskOp::Close(config)
            | MaskOp::Outline(config) => config.validate(false),
            MaskOp::InvertMask | MaskOp::ConnectedComponents { .. } => Ok(()),
        }
    }

    pub fn run(&self, input: &Mask, ctx: &Context) -> PipelineResult<Entry> {
        let entry = match self {
            MaskOp::Dilate(config) => {
                let opts = config.dilate_options(config.background(ctx)?);
                dilate(input, &opts)?.into()
            }
            MaskOp::Erode(config) => {
                erode(input, &config.erode_options(config.background(ctx)?))?.into()
            }
            MaskOp::Open(config) => {
                open(input, &config.erode_options(config.background(ctx)?))?.into()
            }
            MaskOp::Close(config) => {
                close(input, &config.erode_options(config.background(ctx)?))?.into()
            }
            MaskOp::Outline(config) => {
                outline(input, &config.erode_options(config.background(ctx)?))?.into()
            }
            MaskOp::InvertMask => {
                let mut inverted = input.clone();
                inverted.invert_voxels();
                inverted.into()
            }
            MaskOp::ConnectedComponents {
                connectivity,
                do_3d,
                min_voxels,
            } => find_connected_components(input, (*connectivity).into(), *do_3d, *min_voxels)?
                .into(),
        };
        Ok(entry)
    }
}

/// The kernel a step runs, selected by the `"op"` tag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StepOp {
    Channel(ChannelOp),
    Mask(MaskOp),
}

impl StepOp {
    fn input_kind(&self) -> &'static str {
        match self {
            StepOp::Channel(_) => "channel",
            StepOp::Mask(_) => "mask",
        }
    }

    fn output_kind(&self) -> &'static str {
        match self {
            StepOp::Channel(op) => op.output_kind(),
            StepOp::Mask(op) => op.output_kind(),
        }
    }
}

/// One pipeline stage: read `input`, run `op`, store the result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub input: String,
    #[serde(default)]
    pub output: Option<String>,
    pub mutation: Mutation,
    pub op: StepOp,
}

impl Step {
    /// Check the step's configuration without touching any data
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Misconfigured`] when the mutation and
    /// output name disagree, when an in-place step would change the kind
    /// of its entry, or when the op's own parameters are invalid.
    pub fn validate(&self) -> PipelineResult<()> {
        match (self.mutation, &self.output) {
            (Mutation::AllocateNew, None) => {
                return Err(PipelineError::Misconfigured(format!(
                    "step on '{}' allocates a new entry but names no output",
                    self.input
                )));
            }
            (Mutation::InPlace, Some(output)) => {
                return Err(PipelineError::Misconfigured(format!(
                    "in-place step on '{}' also names output '{output}'",
                    self.input
                )));
            }
            _ => {}
        }
        if self.mutation == Mutation::InPlace && self.op.input_kind() != self.op.output_kind() {
            return Err(PipelineError::Misconfigured(format!(
                "in-place step on '{}' would turn a {} into a {}",
                self.input,
                self.op.input_kind(),
                self.op.output_kind()
            )));
        }
        match &self.op {
            StepOp::Channel(op) => op.validate(),
            StepOp::Mask(op) => op.validate(),
        }
    }

    /// Run the step against a context
    ///
    /// The result is computed in full before it is stored, so a failing
    /// step leaves the context unchanged.
    pub fn run(&self, ctx: &mut Context) -> PipelineResult<()> {
        let result = match &self.op {
            StepOp::Channel(op) => op.run(ctx.channel(&self.input)?, ctx)?,
            StepOp::Mask(op) => op.run(ctx.mask(&self.input)?, ctx)?,
        };
        let target = match (self.mutation, &self.output) {
            (Mutation::InPlace, _) => self.input.clone(),
            (Mutation::AllocateNew, Some(output)) => output.clone(),
            (Mutation::AllocateNew, None) => {
                return Err(PipelineError::Misconfigured(format!(
                    "step on '{}' allocates a new entry but names no output",
                    self.input
                )));
            }
        };
        log::trace!("step {} -> {target} ({})", self.input, result.kind_name());
        ctx.insert(target, result);
        Ok(())
    }
}
