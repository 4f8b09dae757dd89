//! Raw sample block codec and the decode/rescale pipeline.

use std::io::{Read, Seek, SeekFrom, Write};

use tracing::trace;

use super::header::{read_header, write_header, Header};
use crate::core::{rescale_slice, Scaling};
use crate::util::{DType, Error, Result, Sample};

/// Bytes between the cursor and the end of `source`. The cursor is left
/// where it was.
pub fn remaining_len<R: Seek>(source: &mut R) -> Result<u64> {
    let pos = source.stream_position()?;
    let end = source.seek(SeekFrom::End(0))?;
    if end != pos {
        source.seek(SeekFrom::Start(pos))?;
    }
    Ok(end.saturating_sub(pos))
}

/// Write `data` verbatim in native byte order.
pub fn write_data<T: Sample, W: Write>(sink: &mut W, data: &[T]) -> Result<()> {
    trace!(dtype = %T::DTYPE, count = data.len(), "write_data");
    sink.write_all(bytemuck::cast_slice(data))?;
    Ok(())
}

/// Read `count` native samples into `target[offset..offset + count]`.
///
/// Fails with `OutOfBounds` if the window does not fit into `target` or the
/// source holds fewer than `count` samples after the cursor.
pub fn read_raw_data<T: Sample, R: Read + Seek>(
    source: &mut R,
    target: &mut [T],
    offset: usize,
    count: usize,
) -> Result<()> {
    let target_len = target.len();
    let window = offset
        .checked_add(count)
        .and_then(|end| target.get_mut(offset..end))
        .ok_or_else(|| Error::out_of_bounds(offset.saturating_add(count), target_len))?;

    let available = remaining_len(source)? / T::SIZE as u64;
    if (count as u64) > available {
        return Err(Error::out_of_bounds(count, available));
    }

    trace!(dtype = %T::DTYPE, offset, count, "read_raw_data");
    source.read_exact(bytemuck::cast_slice_mut(window))?;
    Ok(())
}

/// Read the whole raw sample block described by `header`, which must be
/// stored as `T`. The cursor must sit at the first sample.
pub fn read_raw<T: Sample, R: Read + Seek>(source: &mut R, header: &Header) -> Result<Vec<T>> {
    if header.data_dtype != T::DTYPE {
        return Err(Error::TypeMismatch {
            expected: header.data_dtype,
            actual: T::DTYPE,
        });
    }
    let count = header.num_samples as usize;
    let mut out = vec![T::default(); count];
    read_raw_data(source, &mut out, 0, count)?;
    Ok(out)
}

/// Read the sample block described by `header` and convert it into `T`,
/// applying the header's scaling. The cursor must sit at the first sample.
pub fn read_data<T: Sample, R: Read + Seek>(source: &mut R, header: &Header) -> Result<Vec<T>> {
    let width = header.data_dtype.num_bytes();
    if width == 0 {
        return Err(Error::UnknownTag {
            field: "data",
            tag: header.data_dtype.tag(),
        });
    }

    let available = remaining_len(source)? / width as u64;
    if header.num_samples as u64 > available {
        return Err(Error::out_of_bounds(header.num_samples, available));
    }

    let mut bytes = vec![0u8; header.data_size() as usize];
    source.read_exact(&mut bytes)?;
    trace!(
        native = %header.data_dtype,
        target = %T::DTYPE,
        count = header.num_samples,
        scaled = header.scaling.is_some(),
        "read_data"
    );
    decode_samples(&bytes, header.data_dtype, header.scaling.as_ref())
}

fn decode_as<S: Sample, T: Sample>(bytes: &[u8], scaling: Option<&Scaling>) -> Vec<T> {
    let raw: Vec<S> = bytemuck::pod_collect_to_vec(bytes);
    rescale_slice(&raw, scaling)
}

/// Decode an in-memory raw block of `data_dtype` samples into `T`.
///
/// Alignment of `bytes` is irrelevant. The length must be a multiple of the
/// sample width.
pub fn decode_samples<T: Sample>(
    bytes: &[u8],
    data_dtype: DType,
    scaling: Option<&Scaling>,
) -> Result<Vec<T>> {
    let decode: fn(&[u8], Option<&Scaling>) -> Vec<T> = match data_dtype {
        DType::Int8 => decode_as::<i8, T>,
        DType::Int16 => decode_as::<i16, T>,
        DType::Int32 => decode_as::<i32, T>,
        DType::Int64 => decode_as::<i64, T>,
        DType::Float32 => decode_as::<f32, T>,
        DType::Float64 => decode_as::<f64, T>,
        DType::None => {
            return Err(Error::UnknownTag {
                field: "data",
                tag: data_dtype.tag(),
            })
        }
    };

    let width = data_dtype.num_bytes();
    if bytes.len() % width != 0 {
        return Err(Error::SizeMismatch {
            expected: (bytes.len() - bytes.len() % width) as u64,
            actual: bytes.len() as u64,
        });
    }

    Ok(decode(bytes, scaling))
}

/// Read the header at the cursor followed by all samples, converted into `T`.
pub fn read_samples<T: Sample, R: Read + Seek>(source: &mut R) -> Result<(Header, Vec<T>)> {
    let header = read_header(source)?;
    let data = read_data(source, &header)?;
    Ok((header, data))
}

/// Write `header` followed by `data`.
///
/// `data` must be stored as the header's data dtype and hold exactly
/// `num_samples` elements. Nothing is written on a mismatch.
pub fn write_timeseries_to<T: Sample, W: Write>(
    sink: &mut W,
    header: &Header,
    data: &[T],
) -> Result<()> {
    if header.data_dtype != T::DTYPE {
        return Err(Error::TypeMismatch {
            expected: header.data_dtype,
            actual: T::DTYPE,
        });
    }
    if data.len() as u64 != header.num_samples as u64 {
        return Err(Error::SizeMismatch {
            expected: header.data_size(),
            actual: (data.len() * T::SIZE) as u64,
        });
    }
    write_header(sink, header)?;
    write_data(sink, data)
}
