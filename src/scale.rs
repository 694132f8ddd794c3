//! Log-scale mapping between a normalized slider position and a value of
//! the size field.

use serde::Serialize;

use crate::error::DomainError;

// ---------------------------------------------------------------------------
// NumericDomain
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` of a numeric field. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
}

impl NumericDomain {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Min/max over `values`; `None` when the iterator is empty. NaNs are
    /// skipped.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<Self>, v| match acc {
                None => Some(Self { min: v, max: v }),
                Some(d) => Some(Self {
                    min: d.min.min(v),
                    max: d.max.max(v),
                }),
            })
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    /// Whether `other` lies within this domain.
    pub fn covers(&self, other: &NumericDomain) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Fails unless the domain can back a log scale.
    pub fn check_log_scale(&self) -> Result<(), DomainError> {
        if self.min > 0.0 && self.max.is_finite() {
            Ok(())
        } else {
            Err(DomainError::Invalid { min: self.min })
        }
    }
}

// ---------------------------------------------------------------------------
// NormalizedRange
// ---------------------------------------------------------------------------

/// A slider range `(lo, hi)` with `0 <= lo <= hi <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedRange {
    lo: f64,
    hi: f64,
}

impl NormalizedRange {
    pub const FULL: NormalizedRange = NormalizedRange { lo: 0.0, hi: 1.0 };

    /// Clamp both ends into `[0, 1]` and order them.
    pub fn new(a: f64, b: f64) -> Self {
        let a = clamp_unit(a);
        let b = clamp_unit(b);
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Decode both ends against `domain`.
    pub fn decode(&self, domain: &NumericDomain) -> Result<NumericDomain, DomainError> {
        Ok(NumericDomain {
            min: decode(self.lo, domain)?,
            max: decode(self.hi, domain)?,
        })
    }
}

impl Default for NormalizedRange {
    fn default() -> Self {
        Self::FULL
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Map a normalized position to a domain value by geometric interpolation:
/// `min * (max / min) ^ normalized`.
///
/// The end points map exactly onto `min` and `max`, so rows sitting on the
/// domain boundary survive a full-range filter.
pub fn decode(normalized: f64, domain: &NumericDomain) -> Result<f64, DomainError> {
    domain.check_log_scale()?;
    let t = clamp_unit(normalized);
    if t <= 0.0 {
        return Ok(domain.min);
    }
    if t >= 1.0 {
        return Ok(domain.max);
    }
    Ok(domain.min * (domain.max / domain.min).powf(t))
}

/// One tick of the range control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderMark {
    /// Normalized position in `[0, 1)`.
    pub position: f64,
    /// Decoded value rounded to two decimals.
    pub value: f64,
    pub label: String,
}

/// `steps` evenly spaced marks over `[0, 1)` labelled with their decoded
/// values. Display only; filtering never reads these.
pub fn slider_labels(domain: &NumericDomain, steps: usize) -> Result<Vec<SliderMark>, DomainError> {
    (0..steps)
        .map(|i| {
            let position = i as f64 / steps as f64;
            let value = round2(decode(position, domain)?);
            Ok(SliderMark {
                position,
                value,
                label: format_label(value),
            })
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Shortest rendering of an already-rounded value: `10`, `0.5`, `0.01`.
fn format_label(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
