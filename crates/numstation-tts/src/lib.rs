//! Spoken-number samples for numbers-station.
//!
//! Synthesizes each number of a range with Google Cloud Text-to-Speech and
//! writes the clips as `<n>.wav`, ready for `numstation concat`.
//!
//! ```ignore
//! use numstation_tts::{generate_samples, Credentials, GoogleTts, TtsConfig};
//!
//! let config = TtsConfig::default().credentials(Credentials::ApiKey(key));
//! let tts = GoogleTts::new(config)?;
//! generate_samples(&tts, "samples".as_ref(), 0, 9, |s| println!("{}", s.path.display()))?;
//! ```

pub mod client;
pub mod error;
pub mod samples;

pub use client::{Credentials, GoogleTts, SpeechSynthesizer, TtsConfig};
pub use error::{TtsError, TtsResult};
pub use samples::{generate_samples, sample_path, WrittenSample};
