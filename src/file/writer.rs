//! File-backed timeseries writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::format::{write_data, write_header, Header, HEADER_SIZE};
use crate::util::{Error, Result, Sample};

/// Writer for a `.bts` file: header first, then samples.
///
/// ```ignore
/// let mut w = BtsWriter::create("out.bts")?;
/// w.write_header(&Header::for_samples::<f32>(TimeAxis::long(0, 10), None, 3))?;
/// w.write_data(&[1.0f32, 2.0, 3.0])?;
/// w.finish()?;
/// ```
pub struct BtsWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    pos: u64,
    header: Option<Header>,
}

impl BtsWriter {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        debug!(path = %path.display(), "created timeseries");

        Ok(Self {
            writer: BufWriter::with_capacity(1024 * 1024, file),
            path: path.to_path_buf(),
            pos: 0,
            header: None,
        })
    }

    /// Bytes written so far.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Header written by [`write_header`](Self::write_header), if any.
    #[inline]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Write the header. Must be the first write.
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        if self.header.is_some() || self.pos != 0 {
            return Err(Error::invalid("header already written"));
        }
        write_header(&mut self.writer, header)?;
        self.pos += HEADER_SIZE as u64;
        self.header = Some(*header);
        Ok(())
    }

    /// Append samples. May be called repeatedly; the element type must be
    /// the header's data dtype.
    pub fn write_data<T: Sample>(&mut self, data: &[T]) -> Result<()> {
        let header = self
            .header
            .as_ref()
            .ok_or_else(|| Error::invalid("header must be written before data"))?;
        if header.data_dtype != T::DTYPE {
            return Err(Error::TypeMismatch {
                expected: header.data_dtype,
                actual: T::DTYPE,
            });
        }
        write_data(&mut self.writer, data)?;
        self.pos += (data.len() * T::SIZE) as u64;
        Ok(())
    }

    /// Flush and check that exactly the number of bytes announced by the
    /// header has been written.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        let header = self
            .header
            .ok_or_else(|| Error::invalid("no header written"))?;
        if self.pos != header.file_size() {
            return Err(Error::SizeMismatch {
                expected: header.file_size(),
                actual: self.pos,
            });
        }
        trace!(path = %self.path.display(), size = self.pos, "finished timeseries");
        Ok(())
    }
}
