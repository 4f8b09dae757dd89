//! `.bts` files on disk.

mod reader;
mod writer;

pub use reader::BtsReader;
pub use writer::BtsWriter;

use std::path::Path;

use crate::core::{Scaling, TimeAxis};
use crate::format::Header;
use crate::util::{Error, Result, Sample};

/// Write `data` as a complete `.bts` file and return the header used.
pub fn write_timeseries<T: Sample>(
    path: impl AsRef<Path>,
    time: TimeAxis,
    scaling: Option<Scaling>,
    data: &[T],
) -> Result<Header> {
    let num_samples = u32::try_from(data.len())
        .map_err(|_| Error::invalid(format!("{} samples exceed the u32 sample count", data.len())))?;
    let header = Header::for_samples::<T>(time, scaling, num_samples);

    let mut writer = BtsWriter::create(path)?;
    writer.write_header(&header)?;
    writer.write_data(data)?;
    writer.finish()?;
    Ok(header)
}

/// Read a complete `.bts` file, rescaled and converted into `T`.
pub fn read_timeseries<T: Sample>(path: impl AsRef<Path>) -> Result<(Header, Vec<T>)> {
    let reader = BtsReader::open(path)?;
    let data = reader.scaled()?;
    Ok((*reader.header(), data))
}
