//! Mock door actuator.

use std::sync::{Arc, Mutex};

use tracing::info;

use super::lock;
use crate::{HardwareError, Result, traits::DoorActuator};

/// Servo angle of the open position, in degrees.
pub const OPEN_ANGLE: u16 = 90;

/// Servo angle of the closed position, in degrees.
pub const CLOSED_ANGLE: u16 = 180;

#[derive(Debug)]
struct DoorState {
    angle: u16,
    open_count: usize,
    close_count: usize,
    fault: Option<String>,
}

/// Simulated servo-driven door. Starts closed.
///
/// # Examples
///
/// ```
/// use safebox_hardware::mock::MockDoor;
/// use safebox_hardware::traits::DoorActuator;
///
/// #[tokio::main]
/// async fn main() -> safebox_hardware::Result<()> {
///     let (mut door, handle) = MockDoor::new();
///     door.open().await?;
///
///     assert!(!handle.is_closed());
///     assert_eq!(handle.open_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDoor {
    state: Arc<Mutex<DoorState>>,
}

impl MockDoor {
    pub fn new() -> (Self, MockDoorHandle) {
        let state = Arc::new(Mutex::new(DoorState {
            angle: CLOSED_ANGLE,
            open_count: 0,
            close_count: 0,
            fault: None,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockDoorHandle { state },
        )
    }

    fn move_to(&self, angle: u16) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(message) = state.fault.take() {
            return Err(HardwareError::jammed(message));
        }
        state.angle = angle;
        if angle == OPEN_ANGLE {
            state.open_count += 1;
        } else {
            state.close_count += 1;
        }
        Ok(())
    }
}

impl DoorActuator for MockDoor {
    async fn open(&mut self) -> Result<()> {
        self.move_to(OPEN_ANGLE)?;
        info!(angle = OPEN_ANGLE, "Door opened");
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.move_to(CLOSED_ANGLE)?;
        info!(angle = CLOSED_ANGLE, "Door closed");
        Ok(())
    }

    async fn is_closed(&self) -> Result<bool> {
        Ok(lock(&self.state).angle == CLOSED_ANGLE)
    }
}

/// Observation handle for a [`MockDoor`].
#[derive(Debug, Clone)]
pub struct MockDoorHandle {
    state: Arc<Mutex<DoorState>>,
}

impl MockDoorHandle {
    pub fn is_closed(&self) -> bool {
        lock(&self.state).angle == CLOSED_ANGLE
    }

    /// Number of successful `open` calls.
    pub fn open_count(&self) -> usize {
        lock(&self.state).open_count
    }

    /// Number of successful `close` calls.
    pub fn close_count(&self) -> usize {
        lock(&self.state).close_count
    }

    /// Make the next `open` or `close` fail with a jam.
    pub fn inject_jam(&self, message: impl Into<String>) {
        lock(&self.state).fault = Some(message.into());
    }
}
