//! Affine scaling between raw stored samples and physical values.
//!
//! `physical = offset + raw * factor`, evaluated with the promotion rules of
//! [`Promoted`] and then cast into the requested sample type.

use crate::util::{DType, Error, Promoted, Result, Sample, Scalar};

/// Offset and factor of the affine transform, both of the same dtype.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaling {
    offset: Scalar,
    factor: Scalar,
}

impl Scaling {
    /// Create a scaling from a typed offset and factor.
    pub fn new<T: Sample>(offset: T, factor: T) -> Self {
        Self {
            offset: offset.to_scalar(),
            factor: factor.to_scalar(),
        }
    }

    /// Create a scaling from run-time typed values; both must share a dtype.
    pub fn from_scalars(offset: Scalar, factor: Scalar) -> Result<Self> {
        if offset.dtype() != factor.dtype() {
            return Err(Error::invalid(format!(
                "scaling offset ({}) and factor ({}) must share a dtype",
                offset.dtype(),
                factor.dtype()
            )));
        }
        Ok(Self { offset, factor })
    }

    /// The dtype written into the scaling tag.
    #[inline]
    pub fn dtype(&self) -> DType {
        self.offset.dtype()
    }

    #[inline]
    pub fn offset(&self) -> Scalar {
        self.offset
    }

    #[inline]
    pub fn factor(&self) -> Scalar {
        self.factor
    }

    /// Physical value for one raw sample, before the final cast.
    #[inline]
    pub fn physical(&self, raw: Promoted) -> Promoted {
        Promoted::affine(self.offset.promote(), raw, self.factor.promote())
    }

    /// Physical value for one raw sample, cast into `T`.
    #[inline]
    pub fn apply<T: Sample>(&self, raw: Scalar) -> T {
        self.physical(raw.promote()).cast()
    }
}

/// Convert a raw block of native samples `S` into `T`, applying `scaling`
/// when present and a plain cast otherwise.
pub fn rescale_slice<S: Sample, T: Sample>(raw: &[S], scaling: Option<&Scaling>) -> Vec<T> {
    match scaling {
        Some(scaling) => {
            let offset = scaling.offset.promote();
            let factor = scaling.factor.promote();
            raw.iter()
                .map(|r| Promoted::affine(offset, r.to_scalar().promote(), factor).cast())
                .collect()
        }
        None => raw.iter().map(|r| r.to_scalar().promote().cast()).collect(),
    }
}
