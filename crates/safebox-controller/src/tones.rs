//! Buzzer tone sequences.
//!
//! A [`Melody`] is a fixed list of steps, optionally repeated. Playing one
//! awaits every delay inline, so the caller is blocked for the whole
//! melody.
//!
//! | Melody | Steps | Total |
//! |--------|-------|-------|
//! | [`SUCCESS_CHIME`] | Re, Do, Fa (200 ms each, 100 ms apart) | 800 ms |
//! | [`LOCKOUT_ALARM`] | 5 × (500 Hz 500 ms, 200 ms rest) | 3.5 s |
//! | [`ERROR_BEEP`] | 500 Hz 1 s | 1 s |

use std::time::Duration;

use safebox_hardware::{Buzzer, Note, Result, Tone};

/// Frequency of the alarm and error tones.
const ALARM_FREQUENCY_HZ: u32 = 500;

/// One step of a melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneStep {
    /// Sound `Tone` for the duration, then stop the buzzer.
    Play(Tone, Duration),

    /// Silence.
    Rest(Duration),
}

impl ToneStep {
    /// Time the step takes.
    pub fn duration(&self) -> Duration {
        match self {
            ToneStep::Play(_, duration) | ToneStep::Rest(duration) => *duration,
        }
    }
}

/// A named tone sequence.
#[derive(Debug, Clone, Copy)]
pub struct Melody {
    pub name: &'static str,
    pub steps: &'static [ToneStep],
    pub repeat: usize,
}

impl Melody {
    /// Total playing time, rests included.
    pub fn duration(&self) -> Duration {
        let once: Duration = self.steps.iter().map(ToneStep::duration).sum();
        once * self.repeat as u32
    }

    /// Number of `play` calls the melody makes.
    pub fn note_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, ToneStep::Play(..)))
            .count()
            * self.repeat
    }
}

/// Played on unlock and when leaving the PIN-reset flow.
pub const SUCCESS_CHIME: Melody = Melody {
    name: "success_chime",
    steps: &[
        ToneStep::Play(Tone::Note(Note::Re), Duration::from_millis(200)),
        ToneStep::Rest(Duration::from_millis(100)),
        ToneStep::Play(Tone::Note(Note::Do), Duration::from_millis(200)),
        ToneStep::Rest(Duration::from_millis(100)),
        ToneStep::Play(Tone::Note(Note::Fa), Duration::from_millis(200)),
    ],
    repeat: 1,
};

/// Played on entry into lockout.
pub const LOCKOUT_ALARM: Melody = Melody {
    name: "lockout_alarm",
    steps: &[
        ToneStep::Play(Tone::Frequency(ALARM_FREQUENCY_HZ), Duration::from_millis(500)),
        ToneStep::Rest(Duration::from_millis(200)),
    ],
    repeat: 5,
};

/// Played for each rejected PIN.
pub const ERROR_BEEP: Melody = Melody {
    name: "error_beep",
    steps: &[ToneStep::Play(
        Tone::Frequency(ALARM_FREQUENCY_HZ),
        Duration::from_millis(1000),
    )],
    repeat: 1,
};

/// Play `melody` on `buzzer`, awaiting each delay.
///
/// Stops at the first buzzer error.
pub async fn play<B: Buzzer>(buzzer: &mut B, melody: &Melody) -> Result<()> {
    for _ in 0..melody.repeat {
        for step in melody.steps {
            match *step {
                ToneStep::Play(tone, duration) => {
                    buzzer.play(tone).await?;
                    tokio::time::sleep(duration).await;
                    buzzer.stop().await?;
                }
                ToneStep::Rest(duration) => tokio::time::sleep(duration).await,
            }
        }
    }
    Ok(())
}
