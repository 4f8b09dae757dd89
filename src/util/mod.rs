//! Utility types and functions for BinaryTimeseries.
//!
//! This module contains fundamental types used throughout the library:
//! - [`DType`] - the tag registry shared by all header slots
//! - [`Sample`] - Rust types that can be stored as samples
//! - [`Scalar`] / [`Promoted`] - run-time typed values and rescaling arithmetic
//! - [`Error`] / [`Result`] - Error handling

mod dtype;
mod error;
mod sample;
mod scalar;

pub use dtype::*;
pub use error::*;
pub use sample::*;
pub use scalar::*;
