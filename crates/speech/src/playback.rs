//! Blocking playback of encoded audio through the default output device.

use anyhow::{Context, Result};
use std::io::Cursor;

/// Decodes `audio` (MP3 from the synthesis service) and plays it, blocking
/// until the sink has drained. Callers run this under `spawn_blocking`.
pub fn play_bytes(audio: Vec<u8>) -> Result<()> {
    let (_stream, handle) =
        rodio::OutputStream::try_default().context("No audio output device available")?;
    let sink = rodio::Sink::try_new(&handle).context("Failed to create audio sink")?;
    let source = rodio::Decoder::new(Cursor::new(audio)).context("Failed to decode audio")?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
