//! Fixed 64-byte header codec.

use std::io::{Read, Write};

use byteorder::{ByteOrder, NativeEndian};
use tracing::debug;

use super::layout::*;
use crate::core::{Scaling, TimeAxis};
use crate::util::{DType, Error, Result, Sample, Scalar};

/// Decoded BinaryTimeseries header.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// Time origin and sample interval.
    pub time: TimeAxis,
    /// Affine scaling of the raw samples, `None` if the raw values are physical.
    pub scaling: Option<Scaling>,
    /// Representation of the stored samples.
    pub data_dtype: DType,
    /// Number of stored samples.
    pub num_samples: u32,
}

impl Header {
    /// Create a header; `data_dtype` must not be `DType::None`.
    pub fn new(
        time: TimeAxis,
        scaling: Option<Scaling>,
        data_dtype: DType,
        num_samples: u32,
    ) -> Result<Self> {
        let header = Self {
            time,
            scaling,
            data_dtype,
            num_samples,
        };
        header.validate()?;
        Ok(header)
    }

    /// Create a header for samples stored as `T`.
    pub fn for_samples<T: Sample>(time: TimeAxis, scaling: Option<Scaling>, num_samples: u32) -> Self {
        Self {
            time,
            scaling,
            data_dtype: T::DTYPE,
            num_samples,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.data_dtype == DType::None {
            return Err(Error::invalid("data dtype must not be None"));
        }
        Ok(())
    }

    /// Tag stored in the time slot.
    #[inline]
    pub fn time_dtype(&self) -> DType {
        self.time.dtype()
    }

    /// Tag stored in the scaling slot (`None` when scaling is disabled).
    #[inline]
    pub fn scaling_dtype(&self) -> DType {
        self.scaling.map_or(DType::None, |s| s.dtype())
    }

    /// Size of one stored sample in bytes.
    #[inline]
    pub fn data_width(&self) -> usize {
        self.data_dtype.num_bytes()
    }

    /// Size of the raw sample block in bytes.
    #[inline]
    pub fn data_size(&self) -> u64 {
        self.data_width() as u64 * self.num_samples as u64
    }

    /// Total file size described by this header.
    #[inline]
    pub fn file_size(&self) -> u64 {
        file_size(self.data_width(), self.num_samples as u64)
    }

    /// Serialize into the fixed layout. Unused slots and the reserved span
    /// are zero.
    pub fn encode(&self) -> Result<[u8; HEADER_SIZE]> {
        self.validate()?;
        let mut buf = [0u8; HEADER_SIZE];

        NativeEndian::write_i16(&mut buf[ENDIANNESS_OFFSET..], ENDIANNESS_MARKER);

        buf[TIME_DTYPE_OFFSET] = self.time_dtype().tag();
        match self.time {
            TimeAxis::Long { t0, dt } => {
                NativeEndian::write_i64(&mut buf[T0_OFFSET..], t0);
                NativeEndian::write_i64(&mut buf[DT_OFFSET..], dt);
            }
            TimeAxis::Double { t0, dt } => {
                NativeEndian::write_f64(&mut buf[T0_OFFSET..], t0);
                NativeEndian::write_f64(&mut buf[DT_OFFSET..], dt);
            }
        }

        buf[SCALING_DTYPE_OFFSET] = self.scaling_dtype().tag();
        if let Some(scaling) = &self.scaling {
            scaling.offset().write_slot(&mut buf[SCALING_OFFSET_OFFSET..]);
            scaling.factor().write_slot(&mut buf[SCALING_FACTOR_OFFSET..]);
        }

        buf[DATA_DTYPE_OFFSET] = self.data_dtype.tag();
        NativeEndian::write_u32(&mut buf[NUM_SAMPLES_OFFSET..], self.num_samples);

        Ok(buf)
    }

    /// Parse the fixed layout.
    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        let marker = NativeEndian::read_i16(&buf[ENDIANNESS_OFFSET..]);
        if marker != ENDIANNESS_MARKER {
            return Err(Error::EndiannessMismatch {
                expected: ENDIANNESS_MARKER as u16,
                found: marker as u16,
            });
        }

        let tag = buf[TIME_DTYPE_OFFSET];
        let time = match DType::from_u8(tag) {
            Some(DType::Int64) => TimeAxis::Long {
                t0: NativeEndian::read_i64(&buf[T0_OFFSET..]),
                dt: NativeEndian::read_i64(&buf[DT_OFFSET..]),
            },
            Some(DType::Float64) => TimeAxis::Double {
                t0: NativeEndian::read_f64(&buf[T0_OFFSET..]),
                dt: NativeEndian::read_f64(&buf[DT_OFFSET..]),
            },
            Some(other) => return Err(Error::InvalidTimeType(other)),
            None => return Err(Error::UnknownTag { field: "time", tag }),
        };

        let tag = buf[SCALING_DTYPE_OFFSET];
        let scaling_dtype = DType::from_u8(tag).ok_or(Error::UnknownTag { field: "scaling", tag })?;
        let scaling = match (
            Scalar::read_slot(scaling_dtype, &buf[SCALING_OFFSET_OFFSET..]),
            Scalar::read_slot(scaling_dtype, &buf[SCALING_FACTOR_OFFSET..]),
        ) {
            (Some(offset), Some(factor)) => Some(Scaling::from_scalars(offset, factor)?),
            _ => None,
        };

        let tag = buf[DATA_DTYPE_OFFSET];
        let data_dtype = match DType::from_u8(tag) {
            Some(DType::None) | None => return Err(Error::UnknownTag { field: "data", tag }),
            Some(dtype) => dtype,
        };

        let num_samples = NativeEndian::read_u32(&buf[NUM_SAMPLES_OFFSET..]);

        let header = Self {
            time,
            scaling,
            data_dtype,
            num_samples,
        };
        debug!(
            time = ?header.time,
            scaling = ?header.scaling,
            data_dtype = %header.data_dtype,
            num_samples = header.num_samples,
            "decoded header"
        );
        Ok(header)
    }
}

/// Write the 64-byte header at the sink's cursor.
pub fn write_header<W: Write>(sink: &mut W, header: &Header) -> Result<()> {
    sink.write_all(&header.encode()?)?;
    Ok(())
}

/// Read the 64-byte header at the source's cursor.
///
/// The cursor advances by exactly [`HEADER_SIZE`] bytes whatever tags are found.
pub fn read_header<R: Read>(source: &mut R) -> Result<Header> {
    let mut buf = [0u8; HEADER_SIZE];
    source.read_exact(&mut buf)?;
    Header::decode(&buf)
}
