//! Optional audible cues at session start and end.
//!
//! A best-effort collaborator notification, off unless `--sounds` is given.
//! Playback failures are logged and ignored; cues never affect the capture
//! contract.

#[cfg(target_os = "macos")]
const START_SOUND: &str = "/System/Library/Sounds/Pop.aiff";
#[cfg(target_os = "macos")]
const END_SOUND: &str = "/System/Library/Sounds/Glass.aiff";

pub fn session_start(enabled: bool) {
    if enabled {
        play(true);
    }
}

pub fn session_end(enabled: bool) {
    if enabled {
        play(false);
    }
}

#[cfg(target_os = "macos")]
fn play(start: bool) {
    let sound = if start { START_SOUND } else { END_SOUND };
    if let Err(err) = std::process::Command::new("afplay").arg(sound).spawn() {
        tracing::debug!("cue playback failed: {err}");
    }
}

#[cfg(not(target_os = "macos"))]
fn play(_start: bool) {
    // Terminal bell on stderr; stdout belongs to the status protocol.
    use std::io::Write;
    let mut err = std::io::stderr();
    let _ = err.write_all(b"\x07");
    let _ = err.flush();
}
