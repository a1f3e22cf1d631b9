//! Mock buzzer that records every call.

use std::sync::{Arc, Mutex};

use tracing::trace;

use super::lock;
use crate::{Result, Tone, traits::Buzzer};

/// One recorded buzzer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerCall {
    Beep,
    Play(Tone),
    Stop,
}

#[derive(Debug, Default)]
struct BuzzerState {
    calls: Vec<BuzzerCall>,
    playing: Option<Tone>,
}

/// Simulated passive buzzer.
///
/// # Examples
///
/// ```
/// use safebox_hardware::mock::{BuzzerCall, MockBuzzer};
/// use safebox_hardware::traits::Buzzer;
///
/// #[tokio::main]
/// async fn main() -> safebox_hardware::Result<()> {
///     let (mut buzzer, handle) = MockBuzzer::new();
///     buzzer.beep().await?;
///
///     assert_eq!(handle.calls(), vec![BuzzerCall::Beep]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockBuzzer {
    state: Arc<Mutex<BuzzerState>>,
}

impl MockBuzzer {
    pub fn new() -> (Self, MockBuzzerHandle) {
        let state = Arc::new(Mutex::new(BuzzerState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockBuzzerHandle { state },
        )
    }
}

impl Buzzer for MockBuzzer {
    async fn play(&mut self, tone: Tone) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(BuzzerCall::Play(tone));
        state.playing = Some(tone);
        trace!(%tone, "Buzzer on");
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(BuzzerCall::Stop);
        state.playing = None;
        Ok(())
    }

    async fn beep(&mut self) -> Result<()> {
        lock(&self.state).calls.push(BuzzerCall::Beep);
        trace!("Beep");
        Ok(())
    }
}

/// Observation handle for a [`MockBuzzer`].
#[derive(Debug, Clone)]
pub struct MockBuzzerHandle {
    state: Arc<Mutex<BuzzerState>>,
}

impl MockBuzzerHandle {
    /// Every call, oldest first.
    pub fn calls(&self) -> Vec<BuzzerCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of acknowledgment beeps.
    pub fn beep_count(&self) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| **call == BuzzerCall::Beep)
            .count()
    }

    /// Tones passed to `play`, oldest first.
    pub fn played_tones(&self) -> Vec<Tone> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match call {
                BuzzerCall::Play(tone) => Some(*tone),
                _ => None,
            })
            .collect()
    }

    /// Tone currently sounding, if any.
    pub fn playing(&self) -> Option<Tone> {
        lock(&self.state).playing
    }

    /// Forget recorded calls.
    pub fn reset(&self) {
        lock(&self.state).calls.clear();
    }
}
