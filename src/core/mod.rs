//! Timebase reconstruction and affine sample scaling.
//!
//! This module is independent of any byte layout:
//! - [`TimeAxis`] / [`TimeValue`] - `t0 + i*dt` and its O(1) inverse
//! - [`Scaling`] - `offset + raw*factor` with fixed-width cast semantics

mod scaling;
mod timebase;

pub use scaling::*;
pub use timebase::*;
