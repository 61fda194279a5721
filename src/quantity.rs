//! Resource quantity parsing.
//!
//! The orchestration API expresses resource limits as decimal strings
//! with SI or binary suffixes ("500m", "2", "128Mi", "1.5G"). The engine
//! needs two views of such a quantity:
//!
//! - [`Quantity::unscaled`]: the decimal mantissa with the scale ignored,
//!   which is what the cpu-shares conversion uses ("500m" -> 500,
//!   "2" -> 2, "1Mi" -> 1048576).
//! - [`Quantity::to_bytes`]: the integer value rounded away from zero,
//!   which is what the memory-limit conversion uses ("128Mi" -> 134217728).
//!
//! Quantities parse eagerly at decode time; a malformed quantity fails
//! the decode of the whole workload document.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed resource quantity.
///
/// Internally a decimal `mantissa * 10^exponent`; the raw text is kept
/// so the value re-serializes verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    raw: String,
    mantissa: i128,
    exponent: i32,
}

impl Quantity {
    /// The decimal mantissa, ignoring scale.
    ///
    /// Positive exponents are folded in ("1.5G" -> 1500000000); negative
    /// exponents are dropped ("500m" -> 500). Returns `None` when the
    /// result does not fit in an `i64`.
    pub fn unscaled(&self) -> Option<i64> {
        let value = if self.exponent >= 0 {
            let pow = 10_i128.checked_pow(u32::try_from(self.exponent).ok()?)?;
            self.mantissa.checked_mul(pow)?
        } else {
            self.mantissa
        };
        i64::try_from(value).ok()
    }

    /// The integer value of the quantity, rounded away from zero and
    /// saturating at the `i64` bounds.
    pub fn to_bytes(&self) -> i64 {
        if self.exponent >= 0 {
            let value = u32::try_from(self.exponent)
                .ok()
                .and_then(|e| 10_i128.checked_pow(e))
                .and_then(|pow| self.mantissa.checked_mul(pow));
            match value {
                Some(v) => clamp_i64(v),
                None if self.mantissa < 0 => i64::MIN,
                None => i64::MAX,
            }
        } else {
            // Fractional scale: divide and round away from zero.
            let shift = u32::try_from(-self.exponent).ok();
            match shift.and_then(|s| 10_i128.checked_pow(s)) {
                Some(div) => {
                    let mut q = self.mantissa / div;
                    if self.mantissa % div != 0 {
                        q += self.mantissa.signum();
                    }
                    clamp_i64(q)
                }
                // Scale so deep the value rounds to at most one unit.
                None => self.mantissa.signum() as i64,
            }
        }
    }

    /// The original textual form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn clamp_i64(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// =============================================================================
// Parsing
// =============================================================================

fn parse_quantity(input: &str) -> Result<Quantity, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty quantity".to_string());
    }

    let (negative, rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    // Collect digits and at most one decimal point.
    let mut digits = String::new();
    let mut frac_len: i32 = 0;
    let mut seen_dot = false;
    let mut idx = 0;
    for (i, c) in rest.char_indices() {
        match c {
            '0'..='9' => {
                digits.push(c);
                if seen_dot {
                    frac_len += 1;
                }
            }
            '.' if !seen_dot => seen_dot = true,
            _ => {
                idx = i;
                break;
            }
        }
        idx = i + c.len_utf8();
    }
    if digits.is_empty() {
        return Err(format!("invalid quantity: {input}"));
    }

    let mut mantissa: i128 = digits
        .parse()
        .map_err(|_| format!("quantity mantissa out of range: {input}"))?;
    if negative {
        mantissa = -mantissa;
    }
    let mut exponent = -frac_len;

    let suffix = &rest[idx..];
    match suffix {
        "" => {}
        "m" => exponent -= 3,
        "k" => exponent += 3,
        "M" => exponent += 6,
        "G" => exponent += 9,
        "T" => exponent += 12,
        "P" => exponent += 15,
        "E" => exponent += 18,
        "Ki" | "Mi" | "Gi" | "Ti" | "Pi" | "Ei" => {
            let power = match suffix {
                "Ki" => 1,
                "Mi" => 2,
                "Gi" => 3,
                "Ti" => 4,
                "Pi" => 5,
                _ => 6,
            };
            let mult = 1024_i128
                .checked_pow(power)
                .ok_or_else(|| format!("quantity out of range: {input}"))?;
            mantissa = mantissa
                .checked_mul(mult)
                .ok_or_else(|| format!("quantity out of range: {input}"))?;
            // Fold fractional binary quantities back to the smallest
            // decimal scale ("1.5Gi" -> 1610612736, not 16106127360e-1).
            while exponent < 0 && mantissa % 10 == 0 {
                mantissa /= 10;
                exponent += 1;
            }
        }
        _ if suffix.starts_with('e') || suffix.starts_with('E') => {
            let exp: i32 = suffix[1..]
                .parse()
                .map_err(|_| format!("invalid quantity exponent: {input}"))?;
            exponent += exp;
        }
        _ => return Err(format!("invalid quantity suffix '{suffix}': {input}")),
    }

    Ok(Quantity {
        raw: input.trim().to_string(),
        mantissa,
        exponent,
    })
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a quantity string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
        parse_quantity(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        parse_quantity(&v.to_string()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        parse_quantity(&v.to_string()).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        parse_quantity(&v.to_string()).map_err(E::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
