//! Byte-exact round trips over every combination of time, scaling and data dtype.

use std::io::Cursor;

use bts::core::{Scaling, TimeAxis};
use bts::format::{read_header, read_raw, read_samples, write_timeseries_to, Header};
use bts::util::{DType, Promoted, Sample, Scalar};

const NUM_SAMPLES: usize = 10;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn scalar_bytes(v: Scalar) -> Vec<u8> {
    match v {
        Scalar::Int8(v) => v.to_ne_bytes().to_vec(),
        Scalar::Int16(v) => v.to_ne_bytes().to_vec(),
        Scalar::Int32(v) => v.to_ne_bytes().to_vec(),
        Scalar::Int64(v) => v.to_ne_bytes().to_vec(),
        Scalar::Float32(v) => v.to_ne_bytes().to_vec(),
        Scalar::Float64(v) => v.to_ne_bytes().to_vec(),
    }
}

fn slot(v: Option<Scalar>) -> Vec<u8> {
    let mut out = v.map(scalar_bytes).unwrap_or_default();
    out.resize(8, 0);
    out
}

fn scaling_for(dtype: DType) -> Option<Scaling> {
    match dtype {
        DType::None => None,
        DType::Int8 => Some(Scaling::new(1i8, 24i8)),
        DType::Int16 => Some(Scaling::new(1i16, 24i16)),
        DType::Int32 => Some(Scaling::new(1i32, 24i32)),
        DType::Int64 => Some(Scaling::new(1i64, 24i64)),
        DType::Float32 => Some(Scaling::new(1.2f32, 24.3f32)),
        DType::Float64 => Some(Scaling::new(1.2f64, 24.3f64)),
    }
}

fn time_for(dtype: DType) -> TimeAxis {
    match dtype {
        DType::Int64 => TimeAxis::long(13, 37),
        _ => TimeAxis::double(13.0, 37.0),
    }
}

fn reference_file<T: Sample>(time: TimeAxis, scaling: Option<Scaling>, data: &[T]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&1i16.to_ne_bytes());
    match time {
        TimeAxis::Long { t0, dt } => {
            out.push(4);
            out.extend_from_slice(&t0.to_ne_bytes());
            out.extend_from_slice(&dt.to_ne_bytes());
        }
        TimeAxis::Double { t0, dt } => {
            out.push(6);
            out.extend_from_slice(&t0.to_ne_bytes());
            out.extend_from_slice(&dt.to_ne_bytes());
        }
    }
    out.push(scaling.map_or(0, |s| s.dtype().tag()));
    out.extend(slot(scaling.map(|s| s.offset())));
    out.extend(slot(scaling.map(|s| s.factor())));
    out.extend_from_slice(&[0u8; 23]);
    out.push(T::DTYPE.tag());
    out.extend_from_slice(&(data.len() as u32).to_ne_bytes());
    for v in data {
        out.extend(scalar_bytes(v.to_scalar()));
    }
    out
}

fn check_round_trip<T: Sample>(time_dtype: DType, scaling_dtype: DType) {
    let time = time_for(time_dtype);
    let scaling = scaling_for(scaling_dtype);
    let data: Vec<T> = (0..NUM_SAMPLES as i32)
        .map(|i| Promoted::Int(i * 7 - 20).cast::<T>())
        .collect();

    let header = Header::for_samples::<T>(time, scaling, NUM_SAMPLES as u32);
    let mut cursor = Cursor::new(Vec::new());
    write_timeseries_to(&mut cursor, &header, &data).unwrap();

    let bytes = cursor.into_inner();
    let expected = reference_file(time, scaling, &data);
    assert_eq!(
        bytes, expected,
        "time {time_dtype} scaling {scaling_dtype} data {}",
        T::DTYPE
    );
    assert_eq!(bytes.len() as u64, header.file_size());

    let mut source = Cursor::new(bytes);
    let read_back = read_header(&mut source).unwrap();
    assert_eq!(source.position(), 64);
    assert_eq!(read_back, header);
    assert_eq!(read_back.time_dtype(), time_dtype);
    assert_eq!(read_back.scaling_dtype(), scaling_dtype);

    let raw: Vec<T> = read_raw(&mut source, &read_back).unwrap();
    assert_eq!(raw, data);
}

fn check_all_data<T: Sample>() {
    for time in DType::TIME {
        for scaling in DType::ALL {
            check_round_trip::<T>(time, scaling);
        }
    }
}

#[test]
fn test_round_trip_matrix() {
    init_tracing();
    check_all_data::<i8>();
    check_all_data::<i16>();
    check_all_data::<i32>();
    check_all_data::<i64>();
    check_all_data::<f32>();
    check_all_data::<f64>();
}

#[test]
fn test_file_sizes_for_ten_samples() {
    for (dtype, size) in [
        (DType::Int8, 74u64),
        (DType::Int16, 84),
        (DType::Int32, 104),
        (DType::Int64, 144),
        (DType::Float32, 104),
        (DType::Float64, 144),
    ] {
        let header = Header::new(TimeAxis::long(0, 1), None, dtype, 10).unwrap();
        assert_eq!(header.file_size(), size);
        assert_eq!(bts::format::file_size(dtype.num_bytes(), 10), size);
    }
}

#[test]
fn test_empty_series() {
    init_tracing();
    let header = Header::for_samples::<f64>(TimeAxis::double(0.0, 1.0), None, 0);
    let mut cursor = Cursor::new(Vec::new());
    write_timeseries_to::<f64, _>(&mut cursor, &header, &[]).unwrap();
    assert_eq!(cursor.get_ref().len(), 64);

    cursor.set_position(0);
    let (read_back, data) = read_samples::<i8, _>(&mut cursor).unwrap();
    assert_eq!(read_back.num_samples, 0);
    assert!(data.is_empty());
}
