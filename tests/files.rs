//! Reading and writing `.bts` files on disk.

use bts::core::{first_index_inside, last_index_inside, Scaling, TimeAxis};
use bts::format::{read_samples, Header};
use bts::prelude::*;

use tempfile::tempdir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Ten periods of a 200 kHz acquisition with nanosecond timestamps.
#[test]
fn test_read_subset_by_time() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("acquisition.bts");

    let f: i64 = 200_000;
    let t0: i64 = -99_000_000;
    let dt: i64 = 1_000_000_000 / f;
    let num_values = (10 * f) as usize;
    let values: Vec<i16> = (0..num_values).map(|i| (i % i16::MAX as usize) as i16).collect();

    let header = write_timeseries(&path, TimeAxis::long(t0, dt), None, &values).unwrap();
    assert_eq!(header.file_size(), 64 + 2 * num_values as u64);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), header.file_size());

    let from = 7 * f;
    let upto = 8 * f;
    let from_idx = first_index_inside(t0, dt, from).unwrap();
    let upto_idx = last_index_inside(t0, dt, upto).unwrap();
    assert_eq!((from_idx, upto_idx), (20_080, 20_120));

    for use_mmap in [true, false] {
        let reader = BtsReader::open_opts(&path, use_mmap).unwrap();
        assert_eq!(reader.header(), &header);
        assert_eq!(reader.header().scaling, None);
        assert_eq!(reader.num_samples() as usize, num_values);

        let subset: Vec<i16> = reader.raw_time_range(from, upto).unwrap();
        assert_eq!(subset, &values[from_idx as usize..=upto_idx as usize]);

        let times = reader.timestamps_time_range(from, upto).unwrap();
        assert_eq!(times.len(), subset.len());
        assert_eq!(times[0], from);
        assert_eq!(*times.last().unwrap(), upto);
    }
}

#[test]
fn test_write_read_timeseries() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("scaled.bts");

    let raw: Vec<i16> = vec![0, 1, 2, 3, -4];
    let scaling = Scaling::new(0.5f64, 0.25f64);
    write_timeseries(&path, TimeAxis::double(1.0, 0.1), Some(scaling), &raw).unwrap();

    let (header, volts) = read_timeseries::<f64>(&path).unwrap();
    assert_eq!(header.scaling, Some(scaling));
    assert_eq!(header.data_dtype, DType::Int16);
    assert_eq!(volts, vec![0.5, 0.75, 1.0, 1.25, -0.5]);

    let reader = BtsReader::open(&path).unwrap();
    assert_eq!(reader.raw::<i16>().unwrap(), raw);
    assert_eq!(reader.scaled_range::<f32>(3, 2).unwrap(), vec![1.25, -0.5]);

    // float time axis
    let times = reader.timestamps::<f64>().unwrap();
    assert_eq!(times.len(), 5);
    assert_eq!(times[0], 1.0);
    assert_eq!(times[2], 1.0 + 2.0 * 0.1);
    assert_eq!(reader.index_range(1.1f64, 1.3).unwrap(), Some(1..=3));
    assert_eq!(reader.scaled_time_range::<f64, f64>(1.1, 1.3).unwrap(), vec![0.75, 1.0, 1.25]);
    assert_eq!(reader.index_range(5.0f64, 6.0).unwrap(), None);
}

#[test]
fn test_writer_matches_stream_codec() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chunks.bts");

    let header = Header::for_samples::<i64>(TimeAxis::long(0, 1_000), Some(Scaling::new(5i64, 2i64)), 6);
    let mut writer = BtsWriter::create(&path).unwrap();
    writer.write_header(&header).unwrap();
    for chunk in [[1i64, 2], [3, 4], [5, 6]] {
        writer.write_data(&chunk).unwrap();
    }
    writer.finish().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let (read_back, values) = read_samples::<i32, _>(&mut std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(read_back, header);
    assert_eq!(values, vec![7, 9, 11, 13, 15, 17]);
}

#[test]
fn test_rejects_foreign_files() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("zeros.bts");
    std::fs::write(&path, [0u8; 64]).unwrap();
    assert!(matches!(
        BtsReader::open(&path),
        Err(Error::EndiannessMismatch { found: 0, .. })
    ));

    let path = dir.path().join("swapped.bts");
    let mut bytes = Header::for_samples::<f32>(TimeAxis::long(0, 1), None, 0)
        .encode()
        .unwrap();
    bytes.swap(0, 1);
    std::fs::write(&path, bytes).unwrap();
    assert!(matches!(
        BtsReader::open_opts(&path, false),
        Err(Error::EndiannessMismatch { expected: 1, found: 256 })
    ));
}

#[test]
fn test_library_version() {
    assert!(bts::library_version().starts_with("bts "));
}
