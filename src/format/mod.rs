//! BinaryTimeseries byte layout.
//!
//! A file is a fixed 64-byte header followed by `num_samples` raw samples,
//! everything in the producer's native byte order:
//!
//! ```text
//! offset size field
//!      0    2 endianness marker (i16 1)
//!      2    1 time dtype tag (L or D)
//!      3    8 t0
//!     11    8 dt
//!     19    1 scaling dtype tag (N disables scaling)
//!     20    8 scaling offset, zero padded
//!     28    8 scaling factor, zero padded
//!     36   23 reserved, zero
//!     59    1 data dtype tag
//!     60    4 num_samples (u32)
//!     64    - samples
//! ```
//!
//! Offsets never depend on the chosen tags, so every field is read in place.

pub mod layout;

mod data;
mod explain;
mod header;

pub use data::*;
pub use explain::explain_header;
pub use header::*;
pub use layout::{file_size, HEADER_SIZE};
