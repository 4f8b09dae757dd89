//! Timebase engine for evenly sampled series.
//!
//! Timestamps are never stored. Sample `i` sits at `t0 + i * dt`, and the
//! inverse mapping from a time bound to a sample index is done with one
//! division instead of a search.

use std::ops::RangeInclusive;

use crate::util::{DType, Error, Result, Sample};

/// Time origin and sample interval in one of the two time representations.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeAxis {
    /// Integer timestamps (e.g. nanoseconds since an epoch).
    Long { t0: i64, dt: i64 },
    /// Floating point timestamps (e.g. seconds).
    Double { t0: f64, dt: f64 },
}

impl TimeAxis {
    /// Integer time axis.
    #[inline]
    pub const fn long(t0: i64, dt: i64) -> Self {
        Self::Long { t0, dt }
    }

    /// Floating point time axis.
    #[inline]
    pub const fn double(t0: f64, dt: f64) -> Self {
        Self::Double { t0, dt }
    }

    /// The dtype tag stored in the header for this axis.
    #[inline]
    pub const fn dtype(&self) -> DType {
        match self {
            Self::Long { .. } => DType::Int64,
            Self::Double { .. } => DType::Float64,
        }
    }

    /// Typed `(t0, dt)` if the axis is stored as `T`.
    #[inline]
    pub fn get<T: TimeValue>(&self) -> Option<(T, T)> {
        T::from_axis(self)
    }

    /// Time of sample `index`, in the axis' own representation.
    pub fn time_at<T: TimeValue>(&self, index: u64) -> Option<T> {
        self.get::<T>().map(|(t0, dt)| T::time_at(t0, dt, index))
    }

    /// Time of sample `index` as `f64`, whatever the stored representation.
    pub fn time_f64(&self, index: u64) -> f64 {
        match *self {
            Self::Long { t0, dt } => i64::time_at(t0, dt, index) as f64,
            Self::Double { t0, dt } => f64::time_at(t0, dt, index),
        }
    }
}

/// Time representations supported by the header: `i64` and `f64`.
pub trait TimeValue: Sample {
    /// `t0 + index * dt`.
    fn time_at(t0: Self, dt: Self, index: u64) -> Self;

    /// Smallest `i >= 0` with `t0 + i*dt >= lower`.
    fn first_index_inside(t0: Self, dt: Self, lower: Self) -> Result<i64>;

    /// Largest `i` with `t0 + i*dt <= upper`; negative if `upper < t0`.
    fn last_index_inside(t0: Self, dt: Self, upper: Self) -> Result<i64>;

    /// Wrap into a [`TimeAxis`].
    fn axis(t0: Self, dt: Self) -> TimeAxis;

    /// Unwrap from a [`TimeAxis`] stored as this type.
    fn from_axis(axis: &TimeAxis) -> Option<(Self, Self)>;
}

fn check_step_i64(dt: i64) -> Result<()> {
    if dt <= 0 {
        return Err(Error::invalid(format!("sample interval must be positive, got {dt}")));
    }
    Ok(())
}

fn check_step_f64(dt: f64) -> Result<()> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(Error::invalid(format!("sample interval must be positive and finite, got {dt}")));
    }
    Ok(())
}

#[inline]
fn saturate_i64(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Floor division for a positive divisor.
#[inline]
fn div_floor(num: i128, den: i128) -> i128 {
    num.div_euclid(den)
}

/// Ceiling division for a positive divisor.
#[inline]
fn div_ceil(num: i128, den: i128) -> i128 {
    let q = num.div_euclid(den);
    if num.rem_euclid(den) == 0 { q } else { q + 1 }
}

impl TimeValue for i64 {
    #[inline]
    fn time_at(t0: i64, dt: i64, index: u64) -> i64 {
        t0.wrapping_add((index as i64).wrapping_mul(dt))
    }

    fn first_index_inside(t0: i64, dt: i64, lower: i64) -> Result<i64> {
        check_step_i64(dt)?;
        let idx = div_ceil(lower as i128 - t0 as i128, dt as i128);
        Ok(saturate_i64(idx.max(0)))
    }

    fn last_index_inside(t0: i64, dt: i64, upper: i64) -> Result<i64> {
        check_step_i64(dt)?;
        let idx = div_floor(upper as i128 - t0 as i128, dt as i128);
        Ok(saturate_i64(idx))
    }

    #[inline]
    fn axis(t0: i64, dt: i64) -> TimeAxis {
        TimeAxis::Long { t0, dt }
    }

    #[inline]
    fn from_axis(axis: &TimeAxis) -> Option<(i64, i64)> {
        match *axis {
            TimeAxis::Long { t0, dt } => Some((t0, dt)),
            TimeAxis::Double { .. } => None,
        }
    }
}

impl TimeValue for f64 {
    #[inline]
    fn time_at(t0: f64, dt: f64, index: u64) -> f64 {
        t0 + index as f64 * dt
    }

    fn first_index_inside(t0: f64, dt: f64, lower: f64) -> Result<i64> {
        check_step_f64(dt)?;
        if lower.is_nan() {
            return Err(Error::invalid("lower time bound is NaN"));
        }
        let mut idx = ((lower - t0) / dt).ceil().max(0.0) as i64;
        // the quotient can land one step off the timebase; settle against
        // the exact timestamps `time_at` produces
        if idx > 0 && f64::time_at(t0, dt, (idx - 1) as u64) >= lower {
            idx -= 1;
        } else if idx < i64::MAX && f64::time_at(t0, dt, idx as u64) < lower {
            idx += 1;
        }
        Ok(idx)
    }

    fn last_index_inside(t0: f64, dt: f64, upper: f64) -> Result<i64> {
        check_step_f64(dt)?;
        if upper.is_nan() {
            return Err(Error::invalid("upper time bound is NaN"));
        }
        let mut idx = ((upper - t0) / dt).floor() as i64;
        if idx >= 0 {
            if idx < i64::MAX && f64::time_at(t0, dt, (idx + 1) as u64) <= upper {
                idx += 1;
            } else if f64::time_at(t0, dt, idx as u64) > upper {
                idx -= 1;
            }
        }
        Ok(idx)
    }

    #[inline]
    fn axis(t0: f64, dt: f64) -> TimeAxis {
        TimeAxis::Double { t0, dt }
    }

    #[inline]
    fn from_axis(axis: &TimeAxis) -> Option<(f64, f64)> {
        match *axis {
            TimeAxis::Double { t0, dt } => Some((t0, dt)),
            TimeAxis::Long { .. } => None,
        }
    }
}

/// Fill `target[i] = t0 + i*dt` for the whole slice.
pub fn build_timebase<T: TimeValue>(target: &mut [T], t0: T, dt: T) {
    for (i, t) in target.iter_mut().enumerate() {
        *t = T::time_at(t0, dt, i as u64);
    }
}

/// Fill `target[target_offset + k] = t0 + (source_offset + k)*dt` for `k < count`.
pub fn build_timebase_range<T: TimeValue>(
    source_offset: u64,
    target: &mut [T],
    target_offset: usize,
    count: usize,
    t0: T,
    dt: T,
) -> Result<()> {
    let target_len = target.len();
    let window = target_offset
        .checked_add(count)
        .and_then(|end| target.get_mut(target_offset..end))
        .ok_or_else(|| Error::out_of_bounds(target_offset.saturating_add(count), target_len))?;

    for (k, t) in window.iter_mut().enumerate() {
        *t = T::time_at(t0, dt, source_offset + k as u64);
    }
    Ok(())
}

/// Smallest sample index at or after `lower`.
#[inline]
pub fn first_index_inside<T: TimeValue>(t0: T, dt: T, lower: T) -> Result<i64> {
    T::first_index_inside(t0, dt, lower)
}

/// Largest sample index at or before `upper`.
#[inline]
pub fn last_index_inside<T: TimeValue>(t0: T, dt: T, upper: T) -> Result<i64> {
    T::last_index_inside(t0, dt, upper)
}

/// Inclusive index window of the samples in `[lower, upper]`, clamped to
/// the `num_samples` stored samples. `None` if no sample falls inside.
pub fn index_range<T: TimeValue>(
    t0: T,
    dt: T,
    num_samples: u64,
    lower: T,
    upper: T,
) -> Result<Option<RangeInclusive<u64>>> {
    if !(lower <= upper) {
        return Err(Error::invalid(format!(
            "empty time interval: lower {lower:?} > upper {upper:?}"
        )));
    }
    let first = T::first_index_inside(t0, dt, lower)?;
    let last = T::last_index_inside(t0, dt, upper)?;
    if num_samples == 0 {
        return Ok(None);
    }
    let last = last.min(saturate_i64(num_samples as i128 - 1));
    if last < first {
        return Ok(None);
    }
    Ok(Some(first as u64..=last as u64))
}
