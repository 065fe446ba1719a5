//! voxkit-test - Regression test framework for voxkit
//!
//! Regression tests run a series of numbered comparisons through a
//! [`RegParams`]. A failing comparison does not abort the test; it is
//! recorded and printed, and [`RegParams::cleanup`] reports the verdict.
//!
//! # Usage
//!
//! ```ignore
//! use voxkit_test::RegParams;
//!
//! let mut rp = RegParams::new("dilate");
//! rp.compare_values(5.0, mask.count_on() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! Synthetic inputs shared by the regression tests live in [`fixtures`].

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;
