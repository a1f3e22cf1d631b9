//! Integration tests for the control loop.
//!
//! Keys are fed through the mock keypad and the loop is stopped from a
//! spawned task after a fixed amount of virtual time.

mod common;

use std::time::Duration;

use common::test_data::USER_PIN;
use safebox_controller::{ControlLoop, SafeController, SafeEvent, SafeState};
use safebox_core::{Error, SafeConfig};
use safebox_hardware::TimerService;
use tokio_util::sync::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cancel `stop` after `after` of virtual time.
fn stop_after(stop: &CancellationToken, after: Duration) {
    let stop = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        stop.cancel();
    });
}

#[tokio::test(start_paused = true)]
async fn test_loop_unlocks_from_keypad() {
    let (peripherals, handles) = common::mock_peripherals();
    let controller = SafeController::new(&SafeConfig::default(), peripherals).unwrap();
    let mut control_loop = ControlLoop::new(controller, POLL_INTERVAL);

    handles.keypad.press_sequence(USER_PIN).await.unwrap();
    let stop = CancellationToken::new();
    stop_after(&stop, Duration::from_secs(3));

    control_loop.run(stop).await.unwrap();

    assert_eq!(control_loop.controller().state(), SafeState::Unlocked);
    assert!(!handles.door.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_loop_processes_one_key_per_tick() {
    let (peripherals, handles) = common::mock_peripherals();
    let controller = SafeController::new(&SafeConfig::default(), peripherals).unwrap();
    let mut control_loop = ControlLoop::new(controller, POLL_INTERVAL);

    handles.keypad.press_sequence("123").await.unwrap();
    let stop = CancellationToken::new();
    // First tick fires immediately, the second 100 ms later
    stop_after(&stop, Duration::from_millis(150));

    control_loop.run(stop).await.unwrap();

    assert_eq!(control_loop.controller().pending_input(), "12");
}

#[tokio::test(start_paused = true)]
async fn test_timer_event_is_ignored_and_timer_cleared() {
    let (peripherals, handles) = common::mock_peripherals();
    let controller = SafeController::new(&SafeConfig::default(), peripherals).unwrap();
    let mut control_loop = ControlLoop::new(controller, POLL_INTERVAL);

    control_loop
        .timer_mut()
        .start(Duration::from_millis(500), SafeEvent::Timeout);
    let stop = CancellationToken::new();
    stop_after(&stop, Duration::from_secs(1));

    control_loop.run(stop).await.unwrap();

    assert_eq!(control_loop.controller().state(), SafeState::Idle);
    assert!(control_loop.controller().history().is_empty());
    assert!(!control_loop.timer_mut().is_armed());
    assert!(handles.door.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_armed_timer() {
    let (peripherals, _handles) = common::mock_peripherals();
    let controller = SafeController::new(&SafeConfig::default(), peripherals).unwrap();
    let mut control_loop = ControlLoop::new(controller, POLL_INTERVAL);

    control_loop
        .timer_mut()
        .start(Duration::from_secs(60), SafeEvent::Timeout);
    let stop = CancellationToken::new();
    stop_after(&stop, Duration::from_millis(300));

    control_loop.run(stop).await.unwrap();

    assert!(!control_loop.timer_mut().is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_keypad_disconnect_ends_loop() {
    let (peripherals, handles) = common::mock_peripherals();
    let controller = SafeController::new(&SafeConfig::default(), peripherals).unwrap();
    let mut control_loop = ControlLoop::new(controller, POLL_INTERVAL);

    drop(handles.keypad);
    let result = control_loop.run(CancellationToken::new()).await;

    assert!(matches!(result, Err(Error::Hardware(_))));
}

#[tokio::test(start_paused = true)]
async fn test_door_jam_does_not_stop_loop() {
    let (peripherals, handles) = common::mock_peripherals();
    let controller = SafeController::new(&SafeConfig::default(), peripherals).unwrap();
    let mut control_loop = ControlLoop::new(controller, POLL_INTERVAL);

    handles.keypad.press_sequence(USER_PIN).await.unwrap();
    handles.keypad.press('*').await.unwrap();
    let stop = CancellationToken::new();

    // Jam after the Idle entry has closed the door, before the PIN completes
    let jam = handles.door.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        jam.inject_jam("servo stalled");
    });
    stop_after(&stop, Duration::from_secs(3));

    control_loop.run(stop).await.unwrap();

    // The open failed; the later close went through
    assert_eq!(control_loop.controller().state(), SafeState::Idle);
    assert_eq!(handles.door.open_count(), 0);
    assert!(handles.door.is_closed());
}
