//! Dynamically typed scalar values and the arithmetic used for rescaling.

use byteorder::{ByteOrder, NativeEndian};

use super::{DType, Sample};

/// A single value of one of the six numeric dtypes.
///
/// Used for the header slots whose type is only known at run time
/// (scaling offset and factor).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

impl Scalar {
    /// The dtype tag of this value.
    #[inline]
    pub const fn dtype(&self) -> DType {
        match self {
            Self::Int8(_) => DType::Int8,
            Self::Int16(_) => DType::Int16,
            Self::Int32(_) => DType::Int32,
            Self::Int64(_) => DType::Int64,
            Self::Float32(_) => DType::Float32,
            Self::Float64(_) => DType::Float64,
        }
    }

    /// Decode a value of `dtype` from the leading bytes of `slot`.
    ///
    /// Returns `None` for `DType::None`. `slot` must hold at least
    /// `dtype.num_bytes()` bytes.
    pub fn read_slot(dtype: DType, slot: &[u8]) -> Option<Self> {
        let value = match dtype {
            DType::None => return None,
            DType::Int8 => Self::Int8(slot[0] as i8),
            DType::Int16 => Self::Int16(NativeEndian::read_i16(slot)),
            DType::Int32 => Self::Int32(NativeEndian::read_i32(slot)),
            DType::Int64 => Self::Int64(NativeEndian::read_i64(slot)),
            DType::Float32 => Self::Float32(NativeEndian::read_f32(slot)),
            DType::Float64 => Self::Float64(NativeEndian::read_f64(slot)),
        };
        Some(value)
    }

    /// Encode into the leading bytes of `slot`; the rest is left untouched.
    pub fn write_slot(&self, slot: &mut [u8]) {
        match *self {
            Self::Int8(v) => slot[0] = v as u8,
            Self::Int16(v) => NativeEndian::write_i16(slot, v),
            Self::Int32(v) => NativeEndian::write_i32(slot, v),
            Self::Int64(v) => NativeEndian::write_i64(slot, v),
            Self::Float32(v) => NativeEndian::write_f32(slot, v),
            Self::Float64(v) => NativeEndian::write_f64(slot, v),
        }
    }

    /// Extract the value if it is stored as exactly `T`.
    #[inline]
    pub fn get<T: Sample>(self) -> Option<T> {
        T::from_scalar(self)
    }

    /// Lift into the arithmetic domain.
    #[inline]
    pub fn promote(self) -> Promoted {
        match self {
            Self::Int8(v) => Promoted::Int(v as i32),
            Self::Int16(v) => Promoted::Int(v as i32),
            Self::Int32(v) => Promoted::Int(v),
            Self::Int64(v) => Promoted::Long(v),
            Self::Float32(v) => Promoted::Float(v),
            Self::Float64(v) => Promoted::Double(v),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v:?}"),
            Self::Float64(v) => write!(f, "{v:?}"),
        }
    }
}

const RANK_INT: u8 = 0;
const RANK_LONG: u8 = 1;
const RANK_FLOAT: u8 = 2;
const RANK_DOUBLE: u8 = 3;

/// Intermediate value of the rescaling arithmetic.
///
/// Operands narrower than 32 bits are widened to `Int` before any
/// arithmetic; a binary operation runs in the wider of its two operand
/// kinds (`Int < Long < Float < Double`). Integer arithmetic wraps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Promoted {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Promoted {
    #[inline]
    const fn rank(self) -> u8 {
        match self {
            Self::Int(_) => RANK_INT,
            Self::Long(_) => RANK_LONG,
            Self::Float(_) => RANK_FLOAT,
            Self::Double(_) => RANK_DOUBLE,
        }
    }

    #[inline]
    fn binary(
        self,
        rhs: Self,
        int: fn(i32, i32) -> i32,
        long: fn(i64, i64) -> i64,
        float: fn(f32, f32) -> f32,
        double: fn(f64, f64) -> f64,
    ) -> Self {
        match self.rank().max(rhs.rank()) {
            RANK_INT => Self::Int(int(self.as_i32(), rhs.as_i32())),
            RANK_LONG => Self::Long(long(self.as_i64(), rhs.as_i64())),
            RANK_FLOAT => Self::Float(float(self.as_f32(), rhs.as_f32())),
            _ => Self::Double(double(self.as_f64(), rhs.as_f64())),
        }
    }

    /// Promoted addition.
    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        self.binary(rhs, i32::wrapping_add, i64::wrapping_add, |a, b| a + b, |a, b| a + b)
    }

    /// Promoted multiplication.
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        self.binary(rhs, i32::wrapping_mul, i64::wrapping_mul, |a, b| a * b, |a, b| a * b)
    }

    /// `offset + raw * factor`, evaluated product first.
    #[inline]
    pub fn affine(offset: Self, raw: Self, factor: Self) -> Self {
        offset.add(raw.mul(factor))
    }

    /// Narrow to `i32`: integers wrap, floats truncate toward zero and
    /// saturate (NaN becomes 0).
    #[inline]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Int(v) => v,
            Self::Long(v) => v as i32,
            Self::Float(v) => v as i32,
            Self::Double(v) => v as i32,
        }
    }

    /// Convert to `i64`: floats truncate toward zero and saturate.
    #[inline]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Int(v) => v as i64,
            Self::Long(v) => v,
            Self::Float(v) => v as i64,
            Self::Double(v) => v as i64,
        }
    }

    /// Convert to `f32`, rounding to nearest.
    #[inline]
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Int(v) => v as f32,
            Self::Long(v) => v as f32,
            Self::Float(v) => v,
            Self::Double(v) => v as f32,
        }
    }

    /// Convert to `f64`.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Long(v) => v as f64,
            Self::Float(v) => v as f64,
            Self::Double(v) => v,
        }
    }

    /// Cast into a concrete sample type.
    #[inline]
    pub fn cast<T: Sample>(self) -> T {
        T::from_promoted(self)
    }
}
