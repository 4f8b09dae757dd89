//! File-backed timeseries reader.

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::ops::RangeInclusive;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::core::{build_timebase_range, index_range, TimeValue};
use crate::format::layout::{sample_offset, HEADER_SIZE};
use crate::format::{decode_samples, explain_header, Header};
use crate::util::{Error, Result, Sample};

/// Reader for a `.bts` file.
///
/// The header is parsed and the file length validated on open; samples are
/// read on demand. Supports memory-mapped and locked `File` access, and can
/// be shared between threads in both modes.
pub struct BtsReader {
    inner: SourceInner,
    header: Header,
    size: u64,
}

enum SourceInner {
    /// Memory-mapped file
    #[cfg(feature = "mmap")]
    Mmap(Mmap),
    /// Plain file access, one seek+read at a time
    File(Mutex<File>),
}

impl BtsReader {
    /// Open a file, memory-mapped when the `mmap` feature is enabled.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, cfg!(feature = "mmap"))
    }

    /// Open a file with optional memory mapping.
    ///
    /// `use_mmap` is ignored without the `mmap` feature.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();
        if size < HEADER_SIZE as u64 {
            return Err(Error::SizeMismatch {
                expected: HEADER_SIZE as u64,
                actual: size,
            });
        }

        let inner = Self::map(file, use_mmap)?;

        let mut buf = [0u8; HEADER_SIZE];
        inner.read_into(0, &mut buf)?;
        let header = Header::decode(&buf)?;

        if header.file_size() != size {
            return Err(Error::SizeMismatch {
                expected: header.file_size(),
                actual: size,
            });
        }

        debug!(
            path = %path.display(),
            size,
            mmap = inner.is_mapped(),
            num_samples = header.num_samples,
            "opened timeseries"
        );
        Ok(Self {
            inner,
            header,
            size,
        })
    }

    #[cfg(feature = "mmap")]
    fn map(file: File, use_mmap: bool) -> Result<SourceInner> {
        if use_mmap {
            // Safety: the file is opened read-only and never mutated through the map
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
            Ok(SourceInner::Mmap(mmap))
        } else {
            Ok(SourceInner::File(Mutex::new(file)))
        }
    }

    #[cfg(not(feature = "mmap"))]
    fn map(file: File, _use_mmap: bool) -> Result<SourceInner> {
        Ok(SourceInner::File(Mutex::new(file)))
    }

    /// The parsed header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of stored samples.
    #[inline]
    pub fn num_samples(&self) -> u32 {
        self.header.num_samples
    }

    /// Total file size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the file is memory-mapped.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.inner.is_mapped()
    }

    /// Field-by-field dump of the header.
    pub fn explain(&self) -> Result<String> {
        let bytes = self.inner.bytes(0, HEADER_SIZE)?;
        Ok(explain_header(&bytes))
    }

    fn check_window(&self, from: u64, count: usize) -> Result<()> {
        let available = self.header.num_samples as u64;
        match from.checked_add(count as u64) {
            Some(end) if end <= available => Ok(()),
            end => Err(Error::out_of_bounds(end.unwrap_or(u64::MAX), available)),
        }
    }

    fn sample_bytes(&self, from: u64, count: usize) -> Result<Cow<'_, [u8]>> {
        self.check_window(from, count)?;
        let width = self.header.data_width();
        trace!(from, count, width, "sample_bytes");
        self.inner.bytes(sample_offset(width, from), count * width)
    }

    /// All samples as stored.
    ///
    /// `T` must be the stored sample type.
    pub fn raw<T: Sample>(&self) -> Result<Vec<T>> {
        self.raw_range(0, self.header.num_samples as usize)
    }

    /// `count` samples as stored, starting at sample `from`.
    pub fn raw_range<T: Sample>(&self, from: u64, count: usize) -> Result<Vec<T>> {
        if self.header.data_dtype != T::DTYPE {
            return Err(Error::TypeMismatch {
                expected: self.header.data_dtype,
                actual: T::DTYPE,
            });
        }
        let bytes = self.sample_bytes(from, count)?;
        Ok(bytemuck::pod_collect_to_vec(&*bytes))
    }

    /// All samples, rescaled and converted into `T`.
    pub fn scaled<T: Sample>(&self) -> Result<Vec<T>> {
        self.scaled_range(0, self.header.num_samples as usize)
    }

    /// `count` samples starting at `from`, rescaled and converted into `T`.
    pub fn scaled_range<T: Sample>(&self, from: u64, count: usize) -> Result<Vec<T>> {
        let bytes = self.sample_bytes(from, count)?;
        decode_samples(&bytes, self.header.data_dtype, self.header.scaling.as_ref())
    }

    fn time_params<U: TimeValue>(&self) -> Result<(U, U)> {
        self.header.time.get::<U>().ok_or(Error::TypeMismatch {
            expected: self.header.time_dtype(),
            actual: U::DTYPE,
        })
    }

    /// Timestamps of all samples. `U` must match the stored time dtype.
    pub fn timestamps<U: TimeValue>(&self) -> Result<Vec<U>> {
        self.timestamps_range(0, self.header.num_samples as usize)
    }

    /// Timestamps of `count` samples starting at `from`.
    pub fn timestamps_range<U: TimeValue>(&self, from: u64, count: usize) -> Result<Vec<U>> {
        let (t0, dt) = self.time_params::<U>()?;
        self.check_window(from, count)?;
        let mut out = vec![U::default(); count];
        build_timebase_range(from, &mut out, 0, count, t0, dt)?;
        Ok(out)
    }

    /// Inclusive index window of the samples whose timestamps fall into
    /// `[lower, upper]`, or `None` if there are none.
    pub fn index_range<U: TimeValue>(&self, lower: U, upper: U) -> Result<Option<RangeInclusive<u64>>> {
        let (t0, dt) = self.time_params::<U>()?;
        index_range(t0, dt, self.header.num_samples as u64, lower, upper)
    }

    fn window<U: TimeValue>(&self, lower: U, upper: U) -> Result<(u64, usize)> {
        Ok(match self.index_range(lower, upper)? {
            Some(range) => (*range.start(), (range.end() - range.start() + 1) as usize),
            None => (0, 0),
        })
    }

    /// Stored samples inside `[lower, upper]`.
    pub fn raw_time_range<U: TimeValue, T: Sample>(&self, lower: U, upper: U) -> Result<Vec<T>> {
        let (from, count) = self.window(lower, upper)?;
        self.raw_range(from, count)
    }

    /// Rescaled samples inside `[lower, upper]`.
    pub fn scaled_time_range<U: TimeValue, T: Sample>(&self, lower: U, upper: U) -> Result<Vec<T>> {
        let (from, count) = self.window(lower, upper)?;
        self.scaled_range(from, count)
    }

    /// Timestamps inside `[lower, upper]`.
    pub fn timestamps_time_range<U: TimeValue>(&self, lower: U, upper: U) -> Result<Vec<U>> {
        let (from, count) = self.window(lower, upper)?;
        self.timestamps_range(from, count)
    }
}

impl SourceInner {
    fn is_mapped(&self) -> bool {
        match self {
            #[cfg(feature = "mmap")]
            Self::Mmap(_) => true,
            Self::File(_) => false,
        }
    }

    fn read_into(&self, pos: u64, buf: &mut [u8]) -> Result<()> {
        let bytes = self.bytes(pos, buf.len())?;
        buf.copy_from_slice(&bytes);
        Ok(())
    }

    /// Borrowed for a mapped file, copied otherwise. Bounds are checked by the caller.
    fn bytes(&self, pos: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        match self {
            #[cfg(feature = "mmap")]
            Self::Mmap(mmap) => {
                let start = pos as usize;
                mmap.get(start..start + len)
                    .map(Cow::Borrowed)
                    .ok_or_else(|| Error::out_of_bounds(pos + len as u64, mmap.len()))
            }
            Self::File(file) => {
                let mut f = file.lock();
                f.seek(SeekFrom::Start(pos))?;
                let mut buf = vec![0u8; len];
                f.read_exact(&mut buf)?;
                Ok(Cow::Owned(buf))
            }
        }
    }
}
