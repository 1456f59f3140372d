//! Fixed-window microphone capture to a temporary WAV file.

use anyhow::{Context, Result, bail};
use cpal::SampleFormat;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records from the default input device for `window` and writes the result
/// as 16-bit PCM WAV to a persisted temporary file.
///
/// Blocking for the whole window; callers run this under `spawn_blocking`.
/// The caller owns the returned file and is responsible for deleting it.
pub fn record_to_wav(window: Duration) -> Result<PathBuf> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .context("No default input device found")?;
    tracing::info!(
        device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
        "Recording from input device"
    );

    let supported = device
        .default_input_config()
        .context("No default input configuration")?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels;
    let sample_rate = config.sample_rate.0;

    let samples: Arc<Mutex<Vec<f32>>> = Arc::new(Mutex::new(Vec::new()));
    let error_callback = |err| tracing::error!("Audio stream error: {err}");

    let stream = match sample_format {
        SampleFormat::F32 => {
            let sink = samples.clone();
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &_| sink.lock().unwrap().extend_from_slice(data),
                error_callback,
                None,
            )?
        }
        SampleFormat::I16 => {
            let sink = samples.clone();
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &_| {
                    sink.lock()
                        .unwrap()
                        .extend(data.iter().map(|&s| s as f32 / i16::MAX as f32));
                },
                error_callback,
                None,
            )?
        }
        SampleFormat::U16 => {
            let sink = samples.clone();
            device.build_input_stream(
                &config,
                move |data: &[u16], _: &_| {
                    sink.lock()
                        .unwrap()
                        .extend(data.iter().map(|&s| (s as f32 - 32768.0) / 32768.0));
                },
                error_callback,
                None,
            )?
        }
        format => bail!("Unsupported sample format: {format:?}"),
    };

    stream.play().context("Failed to start input stream")?;
    std::thread::sleep(window);
    drop(stream);

    let temp = tempfile::Builder::new()
        .prefix("cadenza-rec-")
        .suffix(".wav")
        .tempfile()
        .context("Failed to create temporary recording file")?;
    let path = temp
        .into_temp_path()
        .keep()
        .context("Failed to persist recording file")?;

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(&path, spec).context("Failed to create WAV writer")?;
    for &sample in samples.lock().unwrap().iter() {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    Ok(path)
}
