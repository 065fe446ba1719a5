//! Pipeline regression test
//!
//! Runs JSON-configured pipelines against a context:
//!   (1) Invert, threshold and dilate a small channel
//!   (2) Segment the two-object scene at a fixed level and binarize each
//!       object at its mean
//!   (3) Misconfigured or unparsable steps are rejected before anything runs
//!   (4) A failing step leaves its target entry untouched
//!
//! Run with:
//! ```
//! cargo test -p voxkit --test pipeline_reg
//! ```

use voxkit::pipeline::{Context, Pipeline, PipelineError};
use voxkit::{Channel, Extent, Point3, Voxels};
use voxkit_test::{RegParams, fixtures};

#[test]
fn pipeline_reg_basic() {
    let mut rp = RegParams::new("pipeline_basic");

    let pipeline = Pipeline::from_json(
        r#"{"steps": [
            {"input": "raw", "mutation": "in_place", "op": {"op": "invert"}},
            {"input": "raw", "output": "seed", "mutation": "allocate_new",
             "op": {"op": "threshold", "level": 250}},
            {"input": "seed", "output": "grown", "mutation": "allocate_new",
             "op": {"op": "dilate", "iterations": 1, "do_3d": true}}
        ]}"#,
    )
    .expect("parse pipeline");

    let extent = Extent::new(9, 9, 3).unwrap();
    let mut raw = Voxels::filled(extent, 255u8);
    raw.set(4, 4, 1, 0);
    let mut ctx = Context::new();
    ctx.insert("raw", Channel::from_u8(raw));
    pipeline.run(&mut ctx).expect("run pipeline");

    let inverted = ctx.channel("raw").unwrap().as_u8().unwrap();
    rp.compare_values(255.0, inverted.get(4, 4, 1) as f64, 0.0);
    rp.compare_values(1.0, inverted.count_where(|v| v != 0) as f64, 0.0);

    let seed = ctx.mask("seed").unwrap();
    let expected = fixtures::single_voxel_mask(extent, Point3::new(4, 4, 1));
    rp.compare_masks(&expected, seed);

    // Face neighbors in 3D: the seed plus six
    rp.compare_values(7.0, ctx.mask("grown").unwrap().count_on() as f64, 0.0);
    rp.compare_values(3.0, ctx.len() as f64, 0.0);

    assert!(rp.cleanup(), "pipeline_basic regression test failed");
}

#[test]
fn pipeline_reg_segmentation() {
    let mut rp = RegParams::new("pipeline_segmentation");

    let pipeline = Pipeline::from_json(
        r#"{"steps": [
            {"input": "raw", "output": "fg", "mutation": "allocate_new",
             "op": {"op": "threshold_auto", "method": {"method": "constant", "level": 20}}},
            {"input": "raw", "output": "otsu", "mutation": "allocate_new",
             "op": {"op": "threshold_auto", "method": {"method": "otsu"}}},
            {"input": "fg", "output": "cells", "mutation": "allocate_new",
             "op": {"op": "connected_components", "connectivity": "face"}},
            {"input": "raw", "output": "levels", "mutation": "allocate_new",
             "op": {"op": "level_per_object", "objects": "cells",
                    "method": {"method": "mean"}}},
            {"input": "raw", "output": "bright", "mutation": "allocate_new",
             "op": {"op": "threshold_per_object", "objects": "cells",
                    "method": {"method": "mean"}}},
            {"input": "raw", "output": "scores", "mutation": "allocate_new",
             "op": {"op": "component_score", "objects": "cells",
                    "method": {"method": "mean"}, "tolerance": 20}}
        ]}"#,
    )
    .expect("parse pipeline");

    let (voxels, objects) = fixtures::two_regions().unwrap();
    let mut ctx = Context::new();
    ctx.insert("raw", Channel::from_u8(voxels.clone()));
    pipeline.run(&mut ctx).expect("run pipeline");

    // Scene-wide Otsu splits between the objects and keeps the bright one
    let bright_object = objects.get(1).unwrap().count();
    rp.compare_values(bright_object as f64, ctx.mask("otsu").unwrap().count_on() as f64, 0.0);
    rp.compare_values(0.0, ctx.mask("otsu").unwrap().is_on(4, 4, 0) as u8 as f64, 0.0);

    let cells = ctx.objects("cells").unwrap();
    rp.compare_values(2.0, cells.len() as f64, 0.0);
    rp.compare_values(objects.total_voxels() as f64, cells.total_voxels() as f64, 0.0);

    let levels = ctx.channel("levels").unwrap().as_u8().unwrap();
    rp.compare_values(50.0, levels.get(4, 4, 0) as f64, 0.0);
    rp.compare_values(200.0, levels.get(15, 4, 0) as f64, 0.0);

    let half = objects.total_voxels() / 2;
    rp.compare_values(half as f64, ctx.mask("bright").unwrap().count_on() as f64, 0.0);

    let scores = ctx.channel("scores").unwrap().as_u8().unwrap();
    rp.compare_values(half as f64, scores.count_where(|s| s == 192) as f64, 0.0);

    assert!(rp.cleanup(), "pipeline_segmentation regression test failed");
}

#[test]
fn pipeline_reg_misconfigured() {
    let mut rp = RegParams::new("pipeline_misconfigured");

    let rejected = [
        // Allocating without an output name
        r#"{"steps": [{"input": "a", "mutation": "allocate_new", "op": {"op": "invert"}}]}"#,
        // In-place threshold would turn a channel into a mask
        r#"{"steps": [{"input": "a", "mutation": "in_place",
                       "op": {"op": "threshold", "level": 3}}]}"#,
        // Zero iterations
        r#"{"steps": [{"input": "m", "mutation": "in_place",
                       "op": {"op": "erode", "iterations": 0}}]}"#,
        // Gating threshold without a background channel
        r#"{"steps": [{"input": "m", "mutation": "in_place",
                       "op": {"op": "dilate", "min_intensity": 40}}]}"#,
        // Quantile outside [0, 1]
        r#"{"steps": [{"input": "a", "output": "b", "mutation": "allocate_new",
                       "op": {"op": "threshold_auto",
                              "method": {"method": "quantile", "quantile": 1.5}}}]}"#,
    ];
    for json in rejected {
        let result = Pipeline::from_json(json);
        let ok = matches!(result, Err(PipelineError::Misconfigured(_)));
        if !ok {
            eprintln!("  accepted or wrong error: {result:?}");
        }
        rp.compare_values(1.0, ok as u8 as f64, 0.0);
    }

    let malformed = Pipeline::from_json(r#"{"steps": {"input": "a"}}"#);
    rp.compare_values(1.0, matches!(malformed, Err(PipelineError::Json(_))) as u8 as f64, 0.0);

    // A bad step is reported by its position
    let bad_second = Pipeline::from_json(
        r#"{"steps": [
            {"input": "a", "mutation": "in_place", "op": {"op": "invert"}},
            {"input": "a", "mutation": "in_place", "op": {"op": "sharpen"}}
        ]}"#,
    );
    let index = match &bad_second {
        Err(PipelineError::InvalidStep { index, .. }) => *index as f64,
        other => {
            eprintln!("  expected an invalid step, got {other:?}");
            -1.0
        }
    };
    rp.compare_values(1.0, index, 0.0);
    if let Err(e) = &bad_second {
        rp.compare_values(1.0, e.to_string().starts_with("step 1:") as u8 as f64, 0.0);
    }

    assert!(rp.cleanup(), "pipeline_misconfigured regression test failed");
}

#[test]
fn pipeline_reg_failed_step() {
    let mut rp = RegParams::new("pipeline_failed_step");

    let extent = Extent::new(6, 6, 1).unwrap();
    let mut ctx = Context::new();
    ctx.insert("raw", Channel::from_u8(Voxels::filled(extent, 9)));
    ctx.insert("float", Channel::from_f32(Voxels::filled(extent, 0.5)));

    // Dilating a channel: wrong kind
    let pipeline = Pipeline::from_json(
        r#"{"steps": [{"input": "raw", "mutation": "in_place", "op": {"op": "dilate"}}]}"#,
    )
    .unwrap();
    let result = pipeline.run(&mut ctx);
    rp.compare_values(
        1.0,
        matches!(result, Err(PipelineError::WrongKind { .. })) as u8 as f64,
        0.0,
    );

    // Median of a float channel is unsupported; the entry keeps its data
    let pipeline = Pipeline::from_json(
        r#"{"steps": [{"input": "float", "mutation": "in_place",
                       "op": {"op": "median_filter", "half_width": 1}}]}"#,
    )
    .unwrap();
    let result = pipeline.run(&mut ctx);
    rp.compare_values(1.0, matches!(result, Err(PipelineError::Core(_))) as u8 as f64, 0.0);
    let float = ctx.channel("float").unwrap().as_f32().unwrap();
    rp.compare_values(36.0, float.count_where(|v| v == 0.5) as f64, 0.0);

    // Missing input entry
    let pipeline = Pipeline::from_json(
        r#"{"steps": [{"input": "nope", "mutation": "in_place", "op": {"op": "invert"}}]}"#,
    )
    .unwrap();
    let result = pipeline.run(&mut ctx);
    rp.compare_values(
        1.0,
        matches!(result, Err(PipelineError::MissingEntry(_))) as u8 as f64,
        0.0,
    );
    rp.compare_values(2.0, ctx.len() as f64, 0.0);

    assert!(rp.cleanup(), "pipeline_failed_step regression test failed");
}
