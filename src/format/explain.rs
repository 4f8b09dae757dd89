//! Field-by-field dump of a raw header, for debugging broken files.

use std::fmt::Write;

use byteorder::{ByteOrder, NativeEndian};

use super::layout::*;
use crate::util::{DType, Scalar};

fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{b:02x}");
    }
    s
}

struct Dump<'a> {
    buf: &'a [u8],
    out: String,
}

impl Dump<'_> {
    fn field(&mut self, offset: usize, size: usize, name: &str, meaning: impl std::fmt::Display) {
        let _ = writeln!(
            self.out,
            "{offset:>2} {size:>2}  {name:<15} {:<23}  {meaning}",
            hex(&self.buf[offset..offset + size])
        );
    }

    fn error(&mut self, msg: impl std::fmt::Display) -> String {
        let _ = writeln!(self.out, "error: {msg}");
        std::mem::take(&mut self.out)
    }

    fn slot(&mut self, offset: usize, name: &str, dtype: DType) {
        match Scalar::read_slot(dtype, &self.buf[offset..offset + SLOT_SIZE]) {
            Some(v) => self.field(offset, SLOT_SIZE, name, format_args!("{v} ({})", dtype.type_name())),
            None => self.field(offset, SLOT_SIZE, name, "unused"),
        }
    }
}

/// Human readable dump of the 64-byte header at the start of `bytes`.
///
/// One line per field with its offset, size, raw bytes and decoded meaning.
/// Dumping stops at the first field that cannot be interpreted.
pub fn explain_header(bytes: &[u8]) -> String {
    if bytes.len() < HEADER_SIZE {
        return format!(
            "error: header needs {HEADER_SIZE} bytes, only {} available\n",
            bytes.len()
        );
    }

    let mut d = Dump {
        buf: &bytes[..HEADER_SIZE],
        out: String::new(),
    };

    let marker = NativeEndian::read_i16(&d.buf[ENDIANNESS_OFFSET..]);
    if marker == ENDIANNESS_MARKER {
        d.field(ENDIANNESS_OFFSET, 2, "endianness", "ok");
    } else if marker == SWAPPED_ENDIANNESS_MARKER {
        d.field(ENDIANNESS_OFFSET, 2, "endianness", "byte-swapped");
        return d.error("file was written with the other byte order");
    } else {
        d.field(ENDIANNESS_OFFSET, 2, "endianness", marker);
        return d.error(format_args!("invalid endianness marker {marker}"));
    }

    let tag = d.buf[TIME_DTYPE_OFFSET];
    let time = match DType::from_u8(tag) {
        Some(dtype) if dtype.is_time() => dtype,
        Some(dtype) => {
            d.field(TIME_DTYPE_OFFSET, 1, "time dtype", dtype.name());
            return d.error(format_args!("time dtype must be L or D, found {dtype}"));
        }
        None => {
            d.field(TIME_DTYPE_OFFSET, 1, "time dtype", "?");
            return d.error(format_args!("unknown time dtype tag {tag}"));
        }
    };
    d.field(TIME_DTYPE_OFFSET, 1, "time dtype", time.name());
    d.slot(T0_OFFSET, "t0", time);
    d.slot(DT_OFFSET, "dt", time);

    let tag = d.buf[SCALING_DTYPE_OFFSET];
    let Some(scaling) = DType::from_u8(tag) else {
        d.field(SCALING_DTYPE_OFFSET, 1, "scaling dtype", "?");
        return d.error(format_args!("unknown scaling dtype tag {tag}"));
    };
    d.field(SCALING_DTYPE_OFFSET, 1, "scaling dtype", scaling.name());
    d.slot(SCALING_OFFSET_OFFSET, "scaling offset", scaling);
    d.slot(SCALING_FACTOR_OFFSET, "scaling factor", scaling);

    let reserved = &d.buf[RESERVED_OFFSET..RESERVED_OFFSET + RESERVED_SIZE];
    let used = reserved.iter().filter(|b| **b != 0).count();
    let _ = writeln!(
        d.out,
        "{RESERVED_OFFSET:>2} {RESERVED_SIZE:>2}  {:<15} {:<23}  {}",
        "reserved",
        "..",
        if used == 0 {
            "zero".to_string()
        } else {
            format!("{used} non-zero bytes")
        }
    );

    let tag = d.buf[DATA_DTYPE_OFFSET];
    let data = match DType::from_u8(tag) {
        Some(DType::None) | None => {
            d.field(DATA_DTYPE_OFFSET, 1, "data dtype", crate::util::tag_name_lossy(tag));
            return d.error(format_args!("invalid data dtype tag {tag}"));
        }
        Some(dtype) => dtype,
    };
    d.field(DATA_DTYPE_OFFSET, 1, "data dtype", data.name());

    let num_samples = NativeEndian::read_u32(&d.buf[NUM_SAMPLES_OFFSET..]);
    d.field(NUM_SAMPLES_OFFSET, 4, "num samples", num_samples);

    let expected = file_size(data.num_bytes(), num_samples as u64);
    let _ = writeln!(
        d.out,
        "expected file size {expected} bytes, {} available",
        bytes.len()
    );
    d.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Scaling, TimeAxis};
    use crate::format::Header;

    fn encoded() -> [u8; HEADER_SIZE] {
        Header::new(
            TimeAxis::long(13, 37),
            Some(Scaling::new(1.2f64, 24.3f64)),
            DType::Int16,
            10,
        )
        .unwrap()
        .encode()
        .unwrap()
    }

    #[test]
    fn test_explain_valid() {
        let text = explain_header(&encoded());
        assert!(!text.contains("error"));
        assert!(text.contains("t0"));
        assert!(text.contains("13 (i64)"));
        assert!(text.contains("1.2 (f64)"));
        assert!(text.contains("24.3 (f64)"));
        assert!(text.contains("num samples"));
        assert!(text.contains("expected file size 84 bytes, 64 available"));
    }

    #[test]
    fn test_explain_short() {
        assert_eq!(
            explain_header(&[0u8; 10]),
            "error: header needs 64 bytes, only 10 available\n"
        );
        assert!(explain_header(&[]).starts_with("error"));
    }

    #[test]
    fn test_explain_stops_at_first_error() {
        let mut buf = encoded();
        buf[TIME_DTYPE_OFFSET] = DType::Int8.tag();
        let text = explain_header(&buf);
        assert!(text.contains("time dtype must be L or D"));
        assert!(!text.contains("t0"));

        let mut buf = encoded();
        buf.swap(0, 1);
        let text = explain_header(&buf);
        assert!(text.contains("byte-swapped"));
        assert_eq!(text.lines().count(), 2);

        let mut buf = encoded();
        buf[DATA_DTYPE_OFFSET] = 42;
        let text = explain_header(&buf);
        assert!(text.contains("invalid data dtype tag 42"));
        assert!(!text.contains("num samples"));
    }
}
