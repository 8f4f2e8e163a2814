//! The timbre/effects/volume configuration a voice is built from.
//!
//! A `ParameterSet` is an immutable value. Edits go through
//! [`ParameterSet::with_field`], which validates the new value and returns a
//! fresh set, so a voice that is already sounding never observes a change.

mod field;

pub use field::{ParamField, ParamValue};

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Shortest envelope segment. Zero-length ramps click, so they are stretched to this.
pub const MIN_RAMP_SECONDS: f64 = crate::MIN_TIME as f64;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Waveform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Waveform::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "waveform",
                value: s.to_string(),
            })
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

impl FilterType {
    pub const ALL: [FilterType; 3] = [FilterType::LowPass, FilterType::HighPass, FilterType::BandPass];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::LowPass => "lowpass",
            FilterType::HighPass => "highpass",
            FilterType::BandPass => "bandpass",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "filter type",
                value: s.to_string(),
            })
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub waveform: Waveform,
    /// Advisory only; every note-on supplies its own pitch.
    pub frequency: f64,
    /// Cents, -100..=100.
    pub detune: f64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub filter_type: FilterType,
    #[cfg_attr(feature = "serde", serde(rename = "frequency"))]
    pub cutoff: f64,
    #[cfg_attr(feature = "serde", serde(rename = "Q"))]
    pub resonance: f64,
}

/// Envelope times in seconds, sustain as a fraction of the master volume.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack: f64,
    pub decay: f64,
    #[cfg_attr(feature = "serde", serde(rename = "sustain"))]
    pub sustain_level: f64,
    pub release: f64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectsParams {
    #[cfg_attr(feature = "serde", serde(rename = "reverb"))]
    pub reverb_amount: f64,
    #[cfg_attr(feature = "serde", serde(rename = "delay"))]
    pub delay_amount: f64,
    #[cfg_attr(feature = "serde", serde(rename = "distortion"))]
    pub distortion_amount: f64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub oscillator: OscillatorParams,
    pub filter: FilterParams,
    pub envelope: EnvelopeParams,
    pub effects: EffectsParams,
    pub volume: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            oscillator: OscillatorParams {
                waveform: Waveform::Sawtooth,
                frequency: 440.0,
                detune: 0.0,
            },
            filter: FilterParams {
                filter_type: FilterType::LowPass,
                cutoff: 2_000.0,
                resonance: 1.0,
            },
            envelope: EnvelopeParams {
                attack: 0.1,
                decay: 0.2,
                sustain_level: 0.7,
                release: 0.5,
            },
            effects: EffectsParams {
                reverb_amount: 0.3,
                delay_amount: 0.2,
                distortion_amount: 0.0,
            },
            volume: 0.5,
        }
    }
}

impl ParameterSet {
    /// Check every numeric field against its closed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in ParamField::ALL {
            if let ParamValue::Number(value) = self.get(field) {
                field.check(value)?;
            }
        }
        Ok(())
    }

    /// Validate, then stretch envelope times shorter than [`MIN_RAMP_SECONDS`].
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        self.validate()?;
        let mut next = *self;
        let env = &mut next.envelope;
        env.attack = env.attack.max(MIN_RAMP_SECONDS);
        env.decay = env.decay.max(MIN_RAMP_SECONDS);
        env.release = env.release.max(MIN_RAMP_SECONDS);
        Ok(next)
    }

    pub fn get(&self, field: ParamField) -> ParamValue {
        match field {
            ParamField::Waveform => ParamValue::Waveform(self.oscillator.waveform),
            ParamField::Frequency => ParamValue::Number(self.oscillator.frequency),
            ParamField::Detune => ParamValue::Number(self.oscillator.detune),
            ParamField::FilterType => ParamValue::Filter(self.filter.filter_type),
            ParamField::Cutoff => ParamValue::Number(self.filter.cutoff),
            ParamField::Resonance => ParamValue::Number(self.filter.resonance),
            ParamField::Attack => ParamValue::Number(self.envelope.attack),
            ParamField::Decay => ParamValue::Number(self.envelope.decay),
            ParamField::Sustain => ParamValue::Number(self.envelope.sustain_level),
            ParamField::Release => ParamValue::Number(self.envelope.release),
            ParamField::Reverb => ParamValue::Number(self.effects.reverb_amount),
            ParamField::Delay => ParamValue::Number(self.effects.delay_amount),
            ParamField::Distortion => ParamValue::Number(self.effects.distortion_amount),
            ParamField::Volume => ParamValue::Number(self.volume),
        }
    }

    /// Copy of `self` with one leaf field replaced. `self` is never modified.
    pub fn with_field(&self, field: ParamField, value: impl Into<ParamValue>) -> Result<Self, ValidationError> {
        let mut next = *self;
        let value = value.into();
        match field {
            ParamField::Waveform => {
                next.oscillator.waveform = value.as_waveform().ok_or_else(|| field.wrong_kind())?;
            }
            ParamField::FilterType => {
                next.filter.filter_type = value.as_filter().ok_or_else(|| field.wrong_kind())?;
            }
            numeric => {
                let raw = value.as_number().ok_or_else(|| numeric.wrong_kind())?;
                let value = numeric.check(raw)?;
                let slot = match numeric {
                    ParamField::Frequency => &mut next.oscillator.frequency,
                    ParamField::Detune => &mut next.oscillator.detune,
                    ParamField::Cutoff => &mut next.filter.cutoff,
                    ParamField::Resonance => &mut next.filter.resonance,
                    ParamField::Attack => &mut next.envelope.attack,
                    ParamField::Decay => &mut next.envelope.decay,
                    ParamField::Sustain => &mut next.envelope.sustain_level,
                    ParamField::Release => &mut next.envelope.release,
                    ParamField::Reverb => &mut next.effects.reverb_amount,
                    ParamField::Delay => &mut next.effects.delay_amount,
                    ParamField::Distortion => &mut next.effects.distortion_amount,
                    ParamField::Volume | ParamField::Waveform | ParamField::FilterType => &mut next.volume,
                };
                *slot = if numeric.is_time() {
                    value.max(MIN_RAMP_SECONDS)
                } else {
                    value
                };
            }
        }
        Ok(next)
    }

    /// Peak of the attack ramp.
    pub fn peak_gain(&self) -> f64 {
        self.volume
    }

    /// Level held during sustain; never exceeds the volume.
    pub fn sustain_gain(&self) -> f64 {
        self.volume * self.envelope.sustain_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_valid() {
        assert!(ParameterSet::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_resonance_is_rejected_and_original_kept() {
        let params = ParameterSet::default();
        let err = params.with_field(ParamField::Resonance, 35.0).unwrap_err();

        assert!(matches!(err, ValidationError::OutOfRange { field: "filter.Q", .. }));
        assert_eq!(params.filter.resonance, 1.0);
    }

    #[test]
    fn zero_length_ramps_are_stretched() {
        let params = ParameterSet::default()
            .with_field(ParamField::Attack, 0.0)
            .unwrap();
        assert_eq!(params.envelope.attack, MIN_RAMP_SECONDS);

        let mut raw = ParameterSet::default();
        raw.envelope.release = 0.0;
        assert_eq!(raw.normalized().unwrap().envelope.release, MIN_RAMP_SECONDS);
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let err = ParameterSet::default()
            .with_field(ParamField::Volume, f64::NAN)
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotFinite { .. }));
    }

    #[test]
    fn enumerated_fields_reject_numbers() {
        let err = ParameterSet::default()
            .with_field(ParamField::Waveform, 1.0)
            .unwrap_err();
        assert!(matches!(err, ValidationError::WrongKind { .. }));

        let err = ParameterSet::default()
            .with_field(ParamField::Cutoff, Waveform::Sine)
            .unwrap_err();
        assert!(matches!(err, ValidationError::WrongKind { .. }));
    }

    #[test]
    fn sustain_gain_scales_with_volume() {
        let params = ParameterSet::default()
            .with_field(ParamField::Volume, 0.5)
            .and_then(|p| p.with_field(ParamField::Sustain, 0.7))
            .unwrap();
        assert!((params.sustain_gain() - 0.35).abs() < 1e-12);
        assert!(params.sustain_gain() <= params.volume);
    }

    #[test]
    fn enum_names_round_trip_through_strings() {
        for w in Waveform::ALL {
            assert_eq!(w.as_str().parse::<Waveform>().unwrap(), w);
        }
        assert!("noise".parse::<Waveform>().is_err());
        assert_eq!("bandpass".parse::<FilterType>().unwrap(), FilterType::BandPass);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_flat_record_names() {
        let json = serde_json::to_value(ParameterSet::default()).unwrap();

        assert_eq!(json["oscillator"]["type"], "sawtooth");
        assert_eq!(json["filter"]["type"], "lowpass");
        assert_eq!(json["filter"]["Q"], 1.0);
        assert_eq!(json["filter"]["frequency"], 2000.0);
        assert_eq!(json["envelope"]["sustain"], 0.7);
        assert_eq!(json["effects"]["distortion"], 0.0);
        assert_eq!(json["volume"], 0.5);
    }
}
