//! # bts
//!
//! Rust implementation of the BinaryTimeseries (.bts) format: a single
//! channel of evenly sampled numeric data behind a fixed 64-byte header.
//!
//! The header stores the time origin and interval (`i64` or `f64`), an
//! optional affine scaling `offset + raw * factor` and the sample type. Raw
//! samples are stored in native byte order and can be read back as stored
//! or rescaled into any of the six supported sample types.
//!
//! ## Modules
//!
//! - [`util`] - Sample types, dtype tags, errors
//! - [`core`] - Timebase reconstruction and scaling arithmetic
//! - [`format`] - Header layout and stream codec
//! - [`file`] - File reader and writer
//!
//! ## Example
//!
//! ```ignore
//! use bts::prelude::*;
//!
//! let time = TimeAxis::long(-99_000_000, 500);
//! write_timeseries("signal.bts", time, Some(Scaling::new(0.0f64, 1e-3)), &raw)?;
//!
//! let reader = BtsReader::open("signal.bts")?;
//! let volts: Vec<f64> = reader.scaled_time_range(0i64, 10_000)?;
//! ```

pub mod util;
pub mod core;
pub mod format;
pub mod file;

// Re-export commonly used types
pub use util::{DType, Error, Result, Sample};
pub use file::{read_timeseries, write_timeseries, BtsReader, BtsWriter};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{Scaling, TimeAxis, TimeValue};
    pub use crate::file::{read_timeseries, write_timeseries, BtsReader, BtsWriter};
    pub use crate::format::Header;
    pub use crate::util::{DType, Error, Result, Sample};
}

/// Library version with the build date.
pub fn library_version() -> String {
    format!(
        "bts {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BTS_BUILD_DATE")
    )
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_library_version() {
        let v = super::library_version();
        assert!(v.starts_with(concat!("bts ", env!("CARGO_PKG_VERSION"))));
        assert!(v.contains("built "));
    }
}
