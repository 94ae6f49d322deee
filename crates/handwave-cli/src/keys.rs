//! Terminal keyboard fallback
//!
//! Arrow keys scroll, Enter/Space confirms, `m` summons, Esc dismisses.
//! `r` rearms the session, `q` or Ctrl-C quits.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use handwave_core::keyboard::gesture_for_key;
use handwave_core::{Gesture, GesturePipeline, HandwaveConfig, Intent, Viewport};
use tokio::sync::broadcast;

use crate::report::describe;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Restores cooked mode on every exit path
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub async fn run(config: HandwaveConfig) -> Result<()> {
    let mut pipeline = GesturePipeline::new(config, Viewport::default());
    let printer = tokio::spawn(print_intents(pipeline.actions().subscribe()));

    // The fallback stands in for the camera, so interaction starts active
    pipeline.inject(Gesture::Wake);

    tokio::task::spawn_blocking(move || read_keys(pipeline))
        .await
        .context("Keyboard loop panicked")??;

    // The pipeline, and with it the intent sender, is gone: the printer drains and exits
    printer.await.context("Intent printer panicked")?;
    Ok(())
}

fn read_keys(mut pipeline: GesturePipeline) -> Result<()> {
    let _raw = RawModeGuard::enable().context("Failed to enable raw mode")?;
    print!("keys: arrows, enter/space, m, esc; r to rearm, q to quit\r\n");
    io::stdout().flush()?;

    loop {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char('r') => {
                pipeline.reset();
                pipeline.inject(Gesture::Wake);
                continue;
            }
            _ => {}
        }
        match gesture_for_key(&key) {
            Some(gesture) => {
                pipeline.inject(gesture);
            }
            None => tracing::debug!("Unmapped key {:?}", key.code),
        }
    }
    Ok(())
}

async fn print_intents(mut rx: broadcast::Receiver<Intent>) {
    loop {
        match rx.recv().await {
            Ok(intent) => {
                print!("{}\r\n", describe(&intent));
                let _ = io::stdout().flush();
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Intent printer lagged, {} intents dropped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
