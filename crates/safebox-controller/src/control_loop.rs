//! Cooperative control loop.
//!
//! The loop multiplexes three sources with a biased `select!`:
//!
//! 1. the stop token
//! 2. timer events
//! 3. the keypad poll tick
//!
//! Each arm runs to completion before the next `select!`, so a timer event
//! never interleaves with a key being processed. A stop request is observed
//! only between arms.
//!
//! Door faults are logged and the loop keeps running. Any other error ends
//! the loop.

use std::time::Duration;

use safebox_core::{Error, Result};
use safebox_hardware::{
    Buzzer, DoorActuator, Indicator, KeypadScanner, SoftwareTimer, TextDisplay, TimerService,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::controller::SafeController;
use crate::state_machine::SafeEvent;

/// Name of the loop's timer in logs.
const TIMER_NAME: &str = "timer1";

/// Drives a [`SafeController`] until stopped.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use safebox_controller::{ControlLoop, Peripherals, SafeController};
/// use safebox_core::SafeConfig;
/// use safebox_hardware::mock::{MockBuzzer, MockDisplay, MockDoor, MockIndicator, MockKeypad};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> safebox_core::Result<()> {
///     let (keypad, _keys) = MockKeypad::new();
///     let (door, _) = MockDoor::new();
///     let (display, _) = MockDisplay::new();
///     let (indicator, _) = MockIndicator::new();
///     let (buzzer, _) = MockBuzzer::new();
///     let peripherals = Peripherals { keypad, door, display, indicator, buzzer };
///
///     let controller = SafeController::new(&SafeConfig::default(), peripherals)?;
///     let mut control_loop = ControlLoop::new(controller, Duration::from_millis(100));
///
///     let stop = CancellationToken::new();
///     let on_ctrl_c = stop.clone();
///     tokio::spawn(async move {
///         let _ = tokio::signal::ctrl_c().await;
///         on_ctrl_c.cancel();
///     });
///     control_loop.run(stop).await
/// }
/// ```
#[derive(Debug)]
pub struct ControlLoop<K, D, L, I, B> {
    controller: SafeController<K, D, L, I, B>,
    timer: SoftwareTimer<SafeEvent>,
    timer_events: mpsc::Receiver<SafeEvent>,
    poll_interval: Duration,
}

impl<K, D, L, I, B> ControlLoop<K, D, L, I, B>
where
    K: KeypadScanner,
    D: DoorActuator,
    L: TextDisplay,
    I: Indicator,
    B: Buzzer,
{
    /// Wrap `controller`, polling the keypad every `poll_interval`.
    pub fn new(controller: SafeController<K, D, L, I, B>, poll_interval: Duration) -> Self {
        let (timer, timer_events) = SoftwareTimer::new(TIMER_NAME);
        Self {
            controller,
            timer,
            timer_events,
            poll_interval,
        }
    }

    pub fn controller(&self) -> &SafeController<K, D, L, I, B> {
        &self.controller
    }

    /// Timer whose events are fed to the controller.
    pub fn timer_mut(&mut self) -> &mut SoftwareTimer<SafeEvent> {
        &mut self.timer
    }

    /// Start the controller and run until `stop` is cancelled.
    ///
    /// The timer is cancelled on the way out, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hardware`] if the keypad fails.
    pub async fn run(&mut self, stop: CancellationToken) -> Result<()> {
        let result = self.run_until_stopped(&stop).await;
        self.timer.cancel();
        match &result {
            Ok(()) => info!("Control loop stopped"),
            Err(e) => error!(error = %e, "Control loop failed"),
        }
        result
    }

    async fn run_until_stopped(&mut self, stop: &CancellationToken) -> Result<()> {
        keep_running(self.controller.start().await)?;

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Control loop started"
        );

        loop {
            tokio::select! {
                biased;

                _ = stop.cancelled() => {
                    debug!("Stop requested");
                    return Ok(());
                }

                Some(event) = self.timer_events.recv() => {
                    debug!(%event, "Timer event");
                    keep_running(self.controller.handle_event(event).await.map(|_| ()))?;
                }

                _ = ticker.tick() => {
                    keep_running(self.controller.do_activity().await.map(|_| ()))?;
                }
            }
        }
    }
}

/// Swallow door faults so the loop survives a jammed actuator.
fn keep_running(result: Result<()>) -> Result<()> {
    match result {
        Err(Error::ActuatorFault(message)) => {
            error!(%message, "Door actuator fault");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Peripherals;
    use safebox_core::SafeConfig;
    use safebox_hardware::mock::{MockBuzzer, MockDisplay, MockDoor, MockIndicator, MockKeypad};

    #[test]
    fn test_keep_running_absorbs_door_faults() {
        assert!(keep_running(Err(Error::ActuatorFault("jammed".into()))).is_ok());
        assert!(keep_running(Err(Error::Hardware("gone".into()))).is_err());
        assert!(keep_running(Ok(())).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_tick() {
        let (keypad, _keys) = MockKeypad::new();
        let (door, door_handle) = MockDoor::new();
        let (display, display_handle) = MockDisplay::new();
        let (indicator, _) = MockIndicator::new();
        let (buzzer, _) = MockBuzzer::new();
        let peripherals = Peripherals {
            keypad,
            door,
            display,
            indicator,
            buzzer,
        };
        let controller = SafeController::new(&SafeConfig::default(), peripherals).unwrap();
        let mut control_loop = ControlLoop::new(controller, Duration::from_millis(100));

        let stop = CancellationToken::new();
        stop.cancel();
        control_loop.run(stop).await.unwrap();

        // Entry action of Idle still ran
        assert_eq!(display_handle.line(0), "Safe Crew");
        assert!(door_handle.is_closed());
        assert!(!control_loop.timer_mut().is_armed());
    }
}
