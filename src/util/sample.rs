//! Sample trait - the closed set of Rust types a timeseries can hold.

use bytemuck::{Pod, Zeroable};
use std::fmt;

use super::{DType, Promoted, Scalar};

/// Trait for types that can be stored as BinaryTimeseries samples.
///
/// Implemented for `i8`, `i16`, `i32`, `i64`, `f32` and `f64`; the raw
/// sample block is a plain native-endian dump of these.
pub trait Sample:
    Pod + Zeroable + Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static
{
    /// The corresponding dtype tag.
    const DTYPE: DType;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Wrap into a dynamically typed scalar.
    fn to_scalar(self) -> Scalar;

    /// Unwrap a scalar stored as exactly this type.
    fn from_scalar(value: Scalar) -> Option<Self>;

    /// Cast an intermediate rescaling result into this type.
    fn from_promoted(value: Promoted) -> Self;
}

macro_rules! impl_sample {
    ($ty:ty, $variant:ident, |$v:ident| $cast:expr) => {
        impl Sample for $ty {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            #[inline]
            fn from_scalar(value: Scalar) -> Option<Self> {
                match value {
                    Scalar::$variant(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            fn from_promoted($v: Promoted) -> Self {
                $cast
            }
        }
    };
}

impl_sample!(i8, Int8, |v| v.as_i32() as i8);
impl_sample!(i16, Int16, |v| v.as_i32() as i16);
impl_sample!(i32, Int32, |v| v.as_i32());
impl_sample!(i64, Int64, |v| v.as_i64());
impl_sample!(f32, Float32, |v| v.as_f32());
impl_sample!(f64, Float64, |v| v.as_f64());
