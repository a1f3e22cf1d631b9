//! Mock character display.
//!
//! Simulates an LCD with a fixed number of rows and columns. Writes start at
//! the given column and overwrite whatever is there; text past the last
//! column is dropped, like a real HD44780-style panel with autoscroll off.
//!
//! ```text
//!   col 0            15
//!   ┌────────────────┐
//! 0 │Safe Crew       │
//! 1 │Please Input Pin│
//!   └────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tracing::debug;

use super::lock;
use crate::{HardwareError, Result, traits::TextDisplay};

/// Default row count.
const DEFAULT_ROWS: usize = 2;

/// Default column count.
const DEFAULT_COLUMNS: usize = 16;

#[derive(Debug)]
struct DisplayState {
    columns: usize,
    rows: Vec<Vec<char>>,
    clear_count: usize,
}

impl DisplayState {
    fn blank_row(&self) -> Vec<char> {
        vec![' '; self.columns]
    }
}

/// Simulated character display.
///
/// # Examples
///
/// ```
/// use safebox_hardware::mock::MockDisplay;
/// use safebox_hardware::traits::TextDisplay;
///
/// #[tokio::main]
/// async fn main() -> safebox_hardware::Result<()> {
///     let (mut display, handle) = MockDisplay::new();
///     display.show_text("Safe", 0, 0).await?;
///     display.show_text("Unlocked!", 1, 0).await?;
///
///     assert_eq!(handle.line(0), "Safe");
///     assert_eq!(handle.line(1), "Unlocked!");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplay {
    /// Create a 2 × 16 display.
    pub fn new() -> (Self, MockDisplayHandle) {
        Self::with_size(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }

    /// Create a display with custom geometry.
    pub fn with_size(rows: usize, columns: usize) -> (Self, MockDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState {
            columns,
            rows: vec![vec![' '; columns]; rows],
            clear_count: 0,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockDisplayHandle { state },
        )
    }
}

impl TextDisplay for MockDisplay {
    async fn clear(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        let blank = state.blank_row();
        for row in state.rows.iter_mut() {
            row.clone_from(&blank);
        }
        state.clear_count += 1;
        Ok(())
    }

    async fn show_text(&mut self, text: &str, row: usize, col: usize) -> Result<()> {
        let mut state = lock(&self.state);
        let columns = state.columns;
        let row_count = state.rows.len();
        let Some(cells) = state.rows.get_mut(row) else {
            return Err(HardwareError::invalid_data(format!(
                "Row {} out of range (display has {} rows)",
                row, row_count
            )));
        };

        // Control characters are not printable on the panel
        let printable = text.chars().filter(|c| !c.is_control());
        for (cell, c) in cells.iter_mut().skip(col).take(columns).zip(printable) {
            *cell = c;
        }
        debug!(row, col, text, "Display updated");
        Ok(())
    }
}

/// Observation handle for a [`MockDisplay`].
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplayHandle {
    /// Contents of `row` with trailing blanks removed.
    ///
    /// Returns an empty string for rows that do not exist.
    pub fn line(&self, row: usize) -> String {
        lock(&self.state)
            .rows
            .get(row)
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    /// Every row, trailing blanks removed.
    pub fn lines(&self) -> Vec<String> {
        let rows = lock(&self.state).rows.len();
        (0..rows).map(|row| self.line(row)).collect()
    }

    /// Whether every row is blank.
    pub fn is_blank(&self) -> bool {
        self.lines().iter().all(String::is_empty)
    }

    /// Number of `clear` calls.
    pub fn clear_count(&self) -> usize {
        lock(&self.state).clear_count
    }
}
