//! BinaryTimeseries header layout constants.

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Size of every value slot (t0, dt, scaling offset, scaling factor).
pub const SLOT_SIZE: usize = 8;

/// Endianness marker as written by the producer (native byte order).
pub const ENDIANNESS_MARKER: i16 = 1;

/// The marker as seen by a reader whose byte order differs from the writer's.
pub const SWAPPED_ENDIANNESS_MARKER: i16 = ENDIANNESS_MARKER.swap_bytes();

/// Offset of the endianness marker (2 bytes).
pub const ENDIANNESS_OFFSET: usize = 0;

/// Offset of the time dtype tag.
pub const TIME_DTYPE_OFFSET: usize = 2;

/// Offset of the t0 slot.
pub const T0_OFFSET: usize = 3;

/// Offset of the dt slot.
pub const DT_OFFSET: usize = 11;

/// Offset of the scaling dtype tag.
pub const SCALING_DTYPE_OFFSET: usize = 19;

/// Offset of the scaling offset slot.
pub const SCALING_OFFSET_OFFSET: usize = 20;

/// Offset of the scaling factor slot.
pub const SCALING_FACTOR_OFFSET: usize = 28;

/// Offset of the reserved span.
pub const RESERVED_OFFSET: usize = 36;

/// Size of the reserved span.
pub const RESERVED_SIZE: usize = 23;

/// Offset of the data dtype tag.
pub const DATA_DTYPE_OFFSET: usize = 59;

/// Offset of the sample count (u32).
pub const NUM_SAMPLES_OFFSET: usize = 60;

/// Total file size for `num_samples` samples of `data_width` bytes.
#[inline]
pub const fn file_size(data_width: usize, num_samples: u64) -> u64 {
    HEADER_SIZE as u64 + data_width as u64 * num_samples
}

/// Absolute position of sample `index`.
#[inline]
pub const fn sample_offset(data_width: usize, index: u64) -> u64 {
    file_size(data_width, index)
}
