//! Computer keyboard as a two-octave piano.
//!
//!   lower octave (C4..C5)      upper octave (C5..E6)
//!    s d   g h j                2 3   5 6 7   9 0
//!   z x c v b n m ,            q w e r t y u i o p

const LOWER: &str = "zsxdcvgbhnjm,";
const UPPER: &str = "q2w3er5t6y7ui9o0p";

/// MIDI note for a key, if it plays one.
pub fn key_note(key: char) -> Option<u8> {
    if let Some(offset) = LOWER.chars().position(|c| c == key) {
        return Some(60 + offset as u8);
    }
    UPPER.chars().position(|c| c == key).map(|offset| 72 + offset as u8)
}

/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

pub fn key_frequency(key: char) -> Option<f32> {
    key_note(key).map(midi_note_to_freq)
}

pub fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    format!("{}{}", NAMES[note as usize % 12], note as i32 / 12 - 1)
}
