//! Configurable pipelines over named channels, masks and objects
//!
//! A [`Pipeline`] is an ordered list of [`Step`]s loaded from JSON. Each
//! step reads one named entry from a [`Context`], runs a kernel, and either
//! overwrites that entry ([`Mutation::InPlace`]) or stores the result under
//! a new name ([`Mutation::AllocateNew`]).
//!
//! ```
//! use voxkit::pipeline::{Context, Pipeline};
//! use voxkit::{Channel, Extent, Voxels};
//!
//! let pipeline = Pipeline::from_json(
//!     r#"{"steps": [
//!         {"input": "raw", "mutation": "in_place", "op": {"op": "invert"}},
//!         {"input": "raw", "output": "fg", "mutation": "allocate_new",
//!          "op": {"op": "threshold", "level": 128}}
//!     ]}"#,
//! )
//! .unwrap();
//!
//! let mut ctx = Context::new();
//! let extent = Extent::new(4, 4, 1).unwrap();
//! ctx.insert("raw", Channel::from_u8(Voxels::new(extent)));
//! pipeline.run(&mut ctx).unwrap();
//! assert_eq!(ctx.mask("fg").unwrap().count_on(), 16);
//! ```

mod context;
mod error;
mod ops;

pub use context::{Context, Entry};
pub use error::{PipelineError, PipelineResult};
pub use ops::{
    Axis, ChannelOp, CombineOp, ConnectivityConfig, LevelMethod, MaskOp, MorphConfig, Mutation,
    Step, StepOp,
};

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pipeline {
    pub steps: Vec<Step>,
}

/// Steps kept as raw JSON so each one is parsed on its own
#[derive(Deserialize)]
struct RawPipeline {
    steps: Vec<serde_json::Value>,
}

impl Pipeline {
    /// Parse and validate a pipeline
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Json`] when the document itself is
    /// malformed, [`PipelineError::InvalidStep`] naming the first step that
    /// does not parse, and [`PipelineError::Misconfigured`] for a step that
    /// fails validation.
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let raw: RawPipeline = serde_json::from_str(json)?;
        let steps = raw
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value)
                    .map_err(|source| PipelineError::InvalidStep { index, source })
            })
            .collect::<PipelineResult<Vec<Step>>>()?;
        let pipeline = Pipeline { steps };
        pipeline.validate()?;
        Ok(pipeline)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        for (i, step) in self.steps.iter().enumerate() {
            step.validate().map_err(|e| match e {
                PipelineError::Misconfigured(msg) => {
                    PipelineError::Misconfigured(format!("step {i}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Run every step in order
    ///
    /// The whole pipeline is validated first. A step that fails stops the
    /// run; steps before it have already updated `ctx`.
    pub fn run(&self, ctx: &mut Context) -> PipelineResult<()> {
        self.validate()?;
        log::debug!("running pipeline of {} steps over {} entries", self.steps.len(), ctx.len());
        for (i, step) in self.steps.iter().enumerate() {
            log::trace!("step {i}: {:?}", step.op);
            step.run(ctx)?;
        }
        Ok(())
    }
}
