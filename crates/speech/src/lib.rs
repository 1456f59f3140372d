//! Speech I/O stack: microphone capture, audio playback, and the clients for
//! the text-to-speech and speech-to-text services. The [`voice::VoiceAgent`]
//! ties these together behind `cadenza_core::VoiceIo`.

pub mod capture;
pub mod device;
pub mod playback;
pub mod synthesis;
pub mod transcription;
pub mod voice;

pub use device::{AudioDevice, CpalAudioDevice};
pub use synthesis::{ElevenLabsSynthesizer, SpeechSynthesizer};
pub use transcription::{Transcriber, WhisperTranscriber};
pub use voice::VoiceAgent;
