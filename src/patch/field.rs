use std::fmt;

use super::{FilterType, Waveform};
use crate::error::ValidationError;

/// One leaf of a [`ParameterSet`](super::ParameterSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Waveform,
    Frequency,
    Detune,
    FilterType,
    Cutoff,
    Resonance,
    Attack,
    Decay,
    Sustain,
    Release,
    Reverb,
    Delay,
    Distortion,
    Volume,
}

/// A value for one leaf field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Waveform(Waveform),
    Filter(FilterType),
}

impl ParamValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_waveform(self) -> Option<Waveform> {
        match self {
            ParamValue::Waveform(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_filter(self) -> Option<FilterType> {
        match self {
            ParamValue::Filter(t) => Some(t),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<Waveform> for ParamValue {
    fn from(value: Waveform) -> Self {
        ParamValue::Waveform(value)
    }
}

impl From<FilterType> for ParamValue {
    fn from(value: FilterType) -> Self {
        ParamValue::Filter(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v:.3}"),
            ParamValue::Waveform(w) => w.fmt(f),
            ParamValue::Filter(t) => t.fmt(f),
        }
    }
}

impl ParamField {
    pub const ALL: [ParamField; 14] = [
        ParamField::Waveform,
        ParamField::Frequency,
        ParamField::Detune,
        ParamField::FilterType,
        ParamField::Cutoff,
        ParamField::Resonance,
        ParamField::Attack,
        ParamField::Decay,
        ParamField::Sustain,
        ParamField::Release,
        ParamField::Reverb,
        ParamField::Delay,
        ParamField::Distortion,
        ParamField::Volume,
    ];

    pub fn category(self) -> &'static str {
        match self {
            ParamField::Waveform | ParamField::Frequency | ParamField::Detune => "oscillator",
            ParamField::FilterType | ParamField::Cutoff | ParamField::Resonance => "filter",
            ParamField::Attack | ParamField::Decay | ParamField::Sustain | ParamField::Release => {
                "envelope"
            }
            ParamField::Reverb | ParamField::Delay | ParamField::Distortion => "effects",
            ParamField::Volume => "master",
        }
    }

    /// Field name as it appears in persisted records.
    pub fn name(self) -> &'static str {
        match self {
            ParamField::Waveform | ParamField::FilterType => "type",
            ParamField::Frequency | ParamField::Cutoff => "frequency",
            ParamField::Detune => "detune",
            ParamField::Resonance => "Q",
            ParamField::Attack => "attack",
            ParamField::Decay => "decay",
            ParamField::Sustain => "sustain",
            ParamField::Release => "release",
            ParamField::Reverb => "reverb",
            ParamField::Delay => "delay",
            ParamField::Distortion => "distortion",
            ParamField::Volume => "volume",
        }
    }

    /// `category.name`, used in error messages.
    pub fn path(self) -> &'static str {
        match self {
            ParamField::Waveform => "oscillator.type",
            ParamField::Frequency => "oscillator.frequency",
            ParamField::Detune => "oscillator.detune",
            ParamField::FilterType => "filter.type",
            ParamField::Cutoff => "filter.frequency",
            ParamField::Resonance => "filter.Q",
            ParamField::Attack => "envelope.attack",
            ParamField::Decay => "envelope.decay",
            ParamField::Sustain => "envelope.sustain",
            ParamField::Release => "envelope.release",
            ParamField::Reverb => "effects.reverb",
            ParamField::Delay => "effects.delay",
            ParamField::Distortion => "effects.distortion",
            ParamField::Volume => "master.volume",
        }
    }

    /// Parse the `(category, field)` pair of an external `setParameter` call.
    pub fn from_parts(category: &str, field: &str) -> Result<Self, ValidationError> {
        ParamField::ALL
            .into_iter()
            .find(|f| f.category() == category && f.name() == field)
            .ok_or_else(|| ValidationError::UnknownField {
                category: category.to_string(),
                field: field.to_string(),
            })
    }

    /// Closed range of a numeric field; `None` for enumerated fields.
    pub fn range(self) -> Option<(f64, f64)> {
        match self {
            ParamField::Waveform | ParamField::FilterType => None,
            ParamField::Frequency | ParamField::Cutoff => Some((20.0, 20_000.0)),
            ParamField::Detune => Some((-100.0, 100.0)),
            ParamField::Resonance => Some((0.1, 30.0)),
            ParamField::Attack | ParamField::Decay => Some((0.0, 2.0)),
            ParamField::Release => Some((0.0, 3.0)),
            ParamField::Sustain
            | ParamField::Reverb
            | ParamField::Delay
            | ParamField::Distortion
            | ParamField::Volume => Some((0.0, 1.0)),
        }
    }

    pub fn is_time(self) -> bool {
        matches!(self, ParamField::Attack | ParamField::Decay | ParamField::Release)
    }

    pub(crate) fn expected_kind(self) -> &'static str {
        match self {
            ParamField::Waveform => "a waveform",
            ParamField::FilterType => "a filter type",
            _ => "a number",
        }
    }

    pub(crate) fn wrong_kind(self) -> ValidationError {
        ValidationError::WrongKind {
            field: self.path(),
            expected: self.expected_kind(),
        }
    }

    /// Range-check a numeric value for this field.
    pub fn check(self, value: f64) -> Result<f64, ValidationError> {
        let Some((min, max)) = self.range() else {
            return Err(self.wrong_kind());
        };
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: self.path(),
                value,
            });
        }
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                field: self.path(),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
