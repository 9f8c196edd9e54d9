//! Clipboard-based text injection.
//!
//! Places the transcript on the system clipboard, synthesizes a paste chord
//! into the focused application, then restores whatever text was on the
//! clipboard before.

use anyhow::{Context, Result};
use arboard::Clipboard;
use rdev::{simulate, EventType, Key};
use std::thread;
use std::time::Duration;

pub fn inject_text(text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    tracing::debug!(chars = text.len(), "injecting transcript via clipboard");

    let mut clipboard = Clipboard::new().context("failed to open clipboard")?;
    let previous = clipboard.get_text().ok();

    clipboard
        .set_text(text)
        .context("failed to set clipboard text")?;

    // Give the clipboard a moment to settle before the paste chord lands.
    thread::sleep(Duration::from_millis(50));
    simulate_paste()?;
    thread::sleep(Duration::from_millis(100));

    if let Some(prev) = previous {
        if let Err(err) = clipboard.set_text(prev) {
            tracing::warn!("failed to restore clipboard: {err}");
        }
    }
    Ok(())
}

/// Cmd+V on macOS, Ctrl+V elsewhere.
fn simulate_paste() -> Result<()> {
    let delay = Duration::from_millis(20);
    let modifier = if cfg!(target_os = "macos") {
        Key::MetaLeft
    } else {
        Key::ControlLeft
    };

    press(EventType::KeyPress(modifier))?;
    thread::sleep(delay);
    press(EventType::KeyPress(Key::KeyV))?;
    thread::sleep(delay);
    press(EventType::KeyRelease(Key::KeyV))?;
    thread::sleep(delay);
    press(EventType::KeyRelease(modifier))?;
    Ok(())
}

fn press(event: EventType) -> Result<()> {
    simulate(&event).map_err(|err| anyhow::anyhow!("failed to synthesize {event:?}: {err:?}"))
}
