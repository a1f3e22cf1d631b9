//! Mock RGB indicator.

use std::sync::{Arc, Mutex};

use tracing::debug;

use super::lock;
use crate::{LedColor, Result, traits::Indicator};

#[derive(Debug, Default)]
struct IndicatorState {
    rgb: (u8, u8, u8),
    history: Vec<(u8, u8, u8)>,
}

/// Simulated RGB indicator. Starts off.
#[derive(Debug)]
pub struct MockIndicator {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicator {
    pub fn new() -> (Self, MockIndicatorHandle) {
        let state = Arc::new(Mutex::new(IndicatorState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockIndicatorHandle { state },
        )
    }
}

impl Indicator for MockIndicator {
    async fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        let mut state = lock(&self.state);
        state.rgb = (r, g, b);
        state.history.push((r, g, b));
        debug!(r, g, b, "Indicator color set");
        Ok(())
    }
}

/// Observation handle for a [`MockIndicator`].
#[derive(Debug, Clone)]
pub struct MockIndicatorHandle {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicatorHandle {
    /// Current RGB value.
    pub fn rgb(&self) -> (u8, u8, u8) {
        lock(&self.state).rgb
    }

    /// Whether the indicator currently shows `color`.
    pub fn shows(&self, color: LedColor) -> bool {
        self.rgb() == color.as_rgb()
    }

    /// Every value set, oldest first.
    pub fn history(&self) -> Vec<(u8, u8, u8)> {
        lock(&self.state).history.clone()
    }
}
