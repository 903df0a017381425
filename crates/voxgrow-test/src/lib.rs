//! voxgrow-test - Regression test framework for voxgrow
//!
//! Every crate's `tests/*_reg.rs` drives a [`RegParams`] through a series of
//! numbered checks and asserts on [`RegParams::cleanup`] at the end, so one
//! run reports every failing check instead of stopping at the first.
//!
//! # Usage
//!
//! ```ignore
//! use voxgrow_test::RegParams;
//!
//! let mut rp = RegParams::new("growing");
//! rp.compare_values(2.0, region.mean(), 1e-9);
//! assert!(rp.cleanup());
//! ```
//!
//! [`synth`] builds the small synthetic volumes the regression tests share.

mod params;
pub mod synth;

pub use params::RegParams;
