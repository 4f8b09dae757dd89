//! DType - the tag vocabulary shared by the time, scaling and data slots.

use std::fmt;

use super::{Error, Result};

/// Numeric representation tag stored as a single header byte.
///
/// The same tag set is used for the time slot (Int64/Float64 only), the
/// scaling slot (any tag, `None` disables scaling) and the data slot
/// (anything but `None`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DType {
    /// No value (scaling disabled)
    #[default]
    None = 0,
    /// Signed 8-bit integer
    Int8 = 1,
    /// Signed 16-bit integer
    Int16 = 2,
    /// Signed 32-bit integer
    Int32 = 3,
    /// Signed 64-bit integer
    Int64 = 4,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32 = 5,
    /// 64-bit floating point (IEEE 754 double precision)
    Float64 = 6,
}

impl DType {
    /// Every defined tag, in tag order.
    pub const ALL: [DType; 7] = [
        Self::None,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Float32,
        Self::Float64,
    ];

    /// Tags valid for sample data.
    pub const NUMERIC: [DType; 6] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Float32,
        Self::Float64,
    ];

    /// Tags valid for the time axis.
    pub const TIME: [DType; 2] = [Self::Int64, Self::Float64];

    /// Size in bytes of one value of this type (0 for `None`).
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::None => 0,
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 => 8,
            Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// One-letter diagnostic name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "N",
            Self::Int8 => "B",
            Self::Int16 => "S",
            Self::Int32 => "I",
            Self::Int64 => "L",
            Self::Float32 => "F",
            Self::Float64 => "D",
        }
    }

    /// Rust type name of the values, used in diagnostics.
    #[inline]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
        }
    }

    /// Convert from the tag byte.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Int8),
            2 => Some(Self::Int16),
            3 => Some(Self::Int32),
            4 => Some(Self::Int64),
            5 => Some(Self::Float32),
            6 => Some(Self::Float64),
            _ => None,
        }
    }

    /// Tag byte of this type.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Returns true for the integer types.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns true for the floating point types.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Returns true if this tag may describe a time axis.
    #[inline]
    pub const fn is_time(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

impl TryFrom<u8> for DType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Self::from_u8(tag).ok_or(Error::UnknownTag { field: "dtype", tag })
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Byte width for a raw tag byte (0 for `None`).
pub fn width_of(tag: u8) -> Result<usize> {
    DType::try_from(tag).map(DType::num_bytes)
}

/// One-letter name for a raw tag byte.
pub fn tag_name(tag: u8) -> Result<&'static str> {
    DType::try_from(tag).map(DType::name)
}

/// Name for a raw tag byte that never fails; unknown tags render as `?`.
pub fn tag_name_lossy(tag: u8) -> &'static str {
    DType::from_u8(tag).map_or("?", DType::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(width_of(0).unwrap(), 0);
        assert_eq!(width_of(1).unwrap(), 1);
        assert_eq!(width_of(2).unwrap(), 2);
        assert_eq!(width_of(3).unwrap(), 4);
        assert_eq!(width_of(4).unwrap(), 8);
        assert_eq!(width_of(5).unwrap(), 4);
        assert_eq!(width_of(6).unwrap(), 8);
        assert!(matches!(width_of(7), Err(Error::UnknownTag { tag: 7, .. })));
        assert!(matches!(width_of(0xff), Err(Error::UnknownTag { tag: 0xff, .. })));
    }

    #[test]
    fn test_names() {
        let names: String = DType::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names, "NBSILFD");
        assert_eq!(tag_name(4).unwrap(), "L");
        assert!(tag_name(99).is_err());
        assert_eq!(tag_name_lossy(99), "?");
        assert_eq!(format!("{}", DType::Float32), "F");
    }

    #[test]
    fn test_tag_roundtrip() {
        for dtype in DType::ALL {
            assert_eq!(DType::try_from(dtype.tag()).unwrap(), dtype);
        }
    }

    #[test]
    fn test_classification() {
        assert!(DType::NUMERIC.iter().all(|d| d.is_integer() != d.is_float()));
        assert!(!DType::None.is_integer());
        assert!(!DType::None.is_float());
        assert_eq!(
            DType::ALL.iter().filter(|d| d.is_time()).count(),
            DType::TIME.len()
        );
    }
}
