//! Safebox CLI - run the safe controller against simulated peripherals.
//!
//! Type keys on stdin (one or more per line, e.g. `1234` or `#6106`) and the
//! keypad mock delivers them to the controller. The display, door and LED
//! are printed whenever they change. Stop with Ctrl-C.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use safebox_controller::{ControlLoop, Peripherals, SafeController};
use safebox_core::SafeConfig;
use safebox_core::constants::DISPLAY_ROWS;
use safebox_hardware::mock::{
    MockBuzzer, MockDisplay, MockDisplayHandle, MockDoor, MockDoorHandle, MockIndicator,
    MockIndicatorHandle, MockKeypad, MockKeypadHandle,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Keys on the 4×4 matrix keypad.
const KEYPAD_KEYS: &str = "123A456B789C*0#D";

/// How often the console panel checks for changes.
const PANEL_REFRESH: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "safebox")]
#[command(about = "PIN-protected safe controller with simulated peripherals", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User PIN (overrides the configuration file)
    #[arg(long)]
    user_pin: Option<String>,

    /// Failed attempts before lockout (overrides the configuration file)
    #[arg(long)]
    max_attempts: Option<u32>,
}

impl Cli {
    fn load_config(&self) -> Result<SafeConfig> {
        let mut config = match &self.config {
            Some(path) => SafeConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => SafeConfig::default(),
        };
        if let Some(pin) = &self.user_pin {
            config = config.with_user_pin(pin.clone());
        }
        if let Some(max_attempts) = self.max_attempts {
            config = config.with_max_attempts(max_attempts);
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    let (keypad, keypad_handle) = MockKeypad::new();
    let (door, door_handle) = MockDoor::new();
    let (display, display_handle) = MockDisplay::with_size(DISPLAY_ROWS, config.display_columns);
    let (indicator, indicator_handle) = MockIndicator::new();
    let (buzzer, _buzzer_handle) = MockBuzzer::new();

    let peripherals = Peripherals {
        keypad,
        door,
        display,
        indicator,
        buzzer,
    };
    let controller = SafeController::new(&config, peripherals)?;
    let mut control_loop = ControlLoop::new(controller, config.poll_interval());

    let stop = CancellationToken::new();
    spawn_ctrl_c(stop.clone());
    tokio::spawn(feed_keypad(keypad_handle, stop.clone()));
    tokio::spawn(print_panel(
        display_handle,
        door_handle,
        indicator_handle,
        config.display_columns,
        stop.clone(),
    ));

    info!(
        max_attempts = config.max_attempts,
        "Safe ready; type keys and press Enter"
    );
    control_loop.run(stop).await?;
    Ok(())
}

fn spawn_ctrl_c(stop: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, stopping"),
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
        stop.cancel();
    });
}

/// Forward stdin keys to the keypad until EOF or stop.
async fn feed_keypad(keypad: MockKeypadHandle, stop: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = stop.cancelled() => return,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                for key in line.chars().filter(|c| !c.is_whitespace()) {
                    if !KEYPAD_KEYS.contains(key) {
                        warn!("Ignoring '{}': not a keypad key", key);
                        continue;
                    }
                    if keypad.press(key).await.is_err() {
                        return;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    // Dropping the handle would disconnect the keypad
    stop.cancelled().await;
}

/// Print the simulated hardware whenever it changes.
async fn print_panel(
    display: MockDisplayHandle,
    door: MockDoorHandle,
    indicator: MockIndicatorHandle,
    columns: usize,
    stop: CancellationToken,
) {
    let mut ticker = tokio::time::interval(PANEL_REFRESH);
    let mut last: Option<(Vec<String>, bool, (u8, u8, u8))> = None;

    loop {
        tokio::select! {
            _ = stop.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let snapshot = (display.lines(), door.is_closed(), indicator.rgb());
        if last.as_ref() == Some(&snapshot) {
            continue;
        }

        let (lines, closed, (r, g, b)) = &snapshot;
        let border = "─".repeat(columns);
        println!("┌{}┐", border);
        for line in lines {
            println!("│{:<width$}│", line, width = columns);
        }
        println!(
            "└{}┘ door: {}  led: ({}, {}, {})",
            border,
            if *closed { "closed" } else { "open" },
            r,
            g,
            b
        );
        last = Some(snapshot);
    }
}
