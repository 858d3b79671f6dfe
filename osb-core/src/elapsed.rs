//! Elapsed time with a human readable JSON form.
//!
//! Benchmark clients report run times as duration strings such as
//! `"123.456789ms"` or `"1m30s"`, and older clients send a plain number of
//! nanoseconds. [`Elapsed`] accepts both and always writes the string form,
//! so stored score blobs stay readable.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fractional digits kept when parsing; more cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

/// Errors from parsing a duration string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElapsedError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("negative duration {0:?}")]
    Negative(String),

    #[error("duration {0:?} out of range")]
    Overflow(String),
}

/// Wall-clock time spent on one benchmark algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Elapsed(pub Duration);

impl Elapsed {
    pub const ZERO: Elapsed = Elapsed(Duration::ZERO);

    pub fn from_nanos(nanos: u64) -> Self {
        Self(Duration::from_nanos(nanos))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl From<Duration> for Elapsed {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();

        if nanos == 0 {
            return f.write_str("0s");
        }
        if nanos < NANOS_PER_MICRO {
            return write!(f, "{}ns", nanos);
        }
        if nanos < NANOS_PER_MILLI {
            return write!(f, "{}µs", decimal(nanos, 3));
        }
        if nanos < NANOS_PER_SEC {
            return write!(f, "{}ms", decimal(nanos, 6));
        }

        let whole_secs = nanos / NANOS_PER_SEC;
        let hours = whole_secs / 3600;
        let minutes = (whole_secs % 3600) / 60;
        let seconds = decimal((whole_secs % 60) * NANOS_PER_SEC + nanos % NANOS_PER_SEC, 9);

        if hours > 0 {
            write!(f, "{}h{}m{}s", hours, minutes, seconds)
        } else if minutes > 0 {
            write!(f, "{}m{}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

/// Render `value / 10^scale` with trailing zeros of the fraction removed.
fn decimal(value: u128, scale: u32) -> String {
    let divisor = 10u128.pow(scale);
    let int = value / divisor;
    let frac = value % divisor;
    if frac == 0 {
        return int.to_string();
    }
    let digits = format!("{:0width$}", frac, width = scale as usize);
    format!("{}.{}", int, digits.trim_end_matches('0'))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

impl FromStr for Elapsed {
    type Err = ElapsedError;

    /// Parse a sequence of decimal numbers, each with an optional fraction
    /// and a mandatory unit, e.g. `"300ms"`, `"1.5h"` or `"2h45m"`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ElapsedError::Invalid(input.to_owned());

        let mut rest = input.strip_prefix('+').unwrap_or(input);
        if rest.starts_with('-') {
            return Err(ElapsedError::Negative(input.to_owned()));
        }
        if rest == "0" {
            return Ok(Self::ZERO);
        }
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut total: u128 = 0;
        while !rest.is_empty() {
            let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            let (int_digits, after_int) = rest.split_at(int_len);

            let (frac_digits, after_number) = match after_int.strip_prefix('.') {
                Some(tail) => {
                    let frac_len = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
                    tail.split_at(frac_len)
                }
                None => ("", after_int),
            };
            if int_digits.is_empty() && frac_digits.is_empty() {
                return Err(invalid());
            }

            let unit_len = after_number
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(after_number.len());
            let (unit, tail) = after_number.split_at(unit_len);
            if unit.is_empty() {
                return Err(ElapsedError::MissingUnit(input.to_owned()));
            }
            let scale = unit_nanos(unit).ok_or_else(|| ElapsedError::UnknownUnit {
                unit: unit.to_owned(),
                input: input.to_owned(),
            })?;

            let overflow = || ElapsedError::Overflow(input.to_owned());
            let int: u128 = if int_digits.is_empty() {
                0
            } else {
                int_digits.parse().map_err(|_| overflow())?
            };

            let mut component = int.checked_mul(scale).ok_or_else(overflow)?;
            if !frac_digits.is_empty() {
                let kept = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
                let frac: u128 = kept.parse().map_err(|_| invalid())?;
                let frac_nanos = frac.checked_mul(scale).ok_or_else(overflow)?
                    / 10u128.pow(kept.len() as u32);
                component = component.checked_add(frac_nanos).ok_or_else(overflow)?;
            }

            total = total.checked_add(component).ok_or_else(overflow)?;
            rest = tail;
        }

        let nanos = u64::try_from(total).map_err(|_| ElapsedError::Overflow(input.to_owned()))?;
        Ok(Self::from_nanos(nanos))
    }
}

impl Serialize for Elapsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Elapsed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ElapsedVisitor)
    }
}

struct ElapsedVisitor;

impl<'de> Visitor<'de> for ElapsedVisitor {
    type Value = Elapsed;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration string like \"1.5s\" or a number of nanoseconds")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Elapsed, E> {
        Ok(Elapsed::from_nanos(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Elapsed, E> {
        u64::try_from(v)
            .map(Elapsed::from_nanos)
            .map_err(|_| E::custom(ElapsedError::Negative(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Elapsed, E> {
        if !v.is_finite() || v < 0.0 || v > u64::MAX as f64 {
            return Err(E::custom(ElapsedError::Overflow(v.to_string())));
        }
        // fractional nanoseconds are dropped
        Ok(Elapsed::from_nanos(v as u64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Elapsed, E> {
        v.parse().map_err(E::custom)
    }
}
