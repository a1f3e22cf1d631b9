//! Common types shared across the safe's peripherals.
//!
//! This module defines indicator colors and buzzer tones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colors for the RGB status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LedColor {
    /// LED off.
    Off,

    /// Red LED. Locked out.
    Red,

    /// Green LED. Door open.
    Green,

    /// Blue LED. Waiting for a PIN.
    Blue,

    /// Orange LED. Wrong PIN, try again.
    Orange,

    /// Custom RGB color (red, green, blue).
    Custom(u8, u8, u8),
}

impl LedColor {
    /// Create a custom RGB LED color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Custom(r, g, b)
    }

    /// Get the RGB components of the LED color.
    pub fn as_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Off => (0, 0, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::Orange => (255, 165, 0),
            Self::Custom(r, g, b) => (*r, *g, *b),
        }
    }
}

/// Musical notes of the solfège scale (fourth octave).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    Do,
    Re,
    Mi,
    Fa,
    Sol,
    La,
    Si,
}

impl Note {
    /// Frequency of the note in hertz, rounded.
    pub fn frequency_hz(&self) -> u32 {
        match self {
            Note::Do => 262,
            Note::Re => 294,
            Note::Mi => 330,
            Note::Fa => 349,
            Note::Sol => 392,
            Note::La => 440,
            Note::Si => 494,
        }
    }
}

/// A tone the buzzer can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    /// A named note.
    Note(Note),

    /// A raw frequency in hertz.
    Frequency(u32),
}

impl Tone {
    /// Frequency of the tone in hertz.
    pub fn frequency_hz(&self) -> u32 {
        match self {
            Tone::Note(note) => note.frequency_hz(),
            Tone::Frequency(hz) => *hz,
        }
    }
}

impl From<Note> for Tone {
    fn from(note: Note) -> Self {
        Tone::Note(note)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Note(note) => write!(f, "{:?} ({} Hz)", note, note.frequency_hz()),
            Tone::Frequency(hz) => write!(f, "{} Hz", hz),
        }
    }
}
