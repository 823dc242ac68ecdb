//! Google Cloud Text-to-Speech client.
//!
//! Uses the REST `v1/text:synthesize` endpoint with LINEAR16 output, which
//! returns a complete WAV stream (header included) as base64.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{TtsError, TtsResult};

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com";
/// Default BCP-47 language code.
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";
/// Default voice name.
pub const DEFAULT_VOICE: &str = "en-US-Wavenet-E";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding an API key.
pub const API_KEY_ENV: &str = "GOOGLE_TTS_API_KEY";
/// Environment variable holding an OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Anything that can turn text into a WAV stream.
pub trait SpeechSynthesizer {
    /// Synthesizes `text`, returning complete WAV bytes.
    fn synthesize(&self, text: &str) -> TtsResult<Vec<u8>>;
}

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API key sent as the `key` query parameter.
    ApiKey(String),
    /// OAuth token sent as a bearer `Authorization` header.
    AccessToken(String),
}

impl Credentials {
    /// Reads credentials from the environment. An API key wins over a token.
    pub fn from_env() -> Option<Self> {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        non_empty(API_KEY_ENV)
            .map(Credentials::ApiKey)
            .or_else(|| non_empty(ACCESS_TOKEN_ENV).map(Credentials::AccessToken))
    }
}

// Never print secrets
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(***)"),
            Credentials::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

/// Configuration for [`GoogleTts`].
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// API base URL, without trailing path.
    pub endpoint: String,
    /// BCP-47 language code, e.g. `en-US`.
    pub language_code: String,
    /// Voice name, e.g. `en-US-Wavenet-E`.
    pub voice: String,
    /// Authentication.
    pub credentials: Option<Credentials>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TtsConfig {
    /// Sets the endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the language code.
    pub fn language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }

    /// Sets the voice name.
    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Sets credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the synthesize method.
    pub fn synthesize_url(&self) -> String {
        format!("{}/v1/text:synthesize", self.endpoint.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SynthesizeRequest<'a> {
    pub input: SynthesisInput<'a>,
    pub voice: VoiceSelection<'a>,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct SynthesisInput<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoiceSelection<'a> {
    pub language_code: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AudioConfig {
    pub audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SynthesizeResponse {
    pub audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Google Cloud Text-to-Speech over REST.
#[derive(Debug)]
pub struct GoogleTts {
    config: TtsConfig,
    credentials: Credentials,
    http: reqwest::blocking::Client,
}

impl GoogleTts {
    /// Creates a client. Fails if no credentials are configured.
    pub fn new(config: TtsConfig) -> TtsResult<Self> {
        let credentials = config
            .credentials
            .clone()
            .ok_or(TtsError::MissingCredentials)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            credentials,
            http,
        })
    }

    /// Client configuration.
    pub fn config(&self) -> &TtsConfig {
        &self.config
    }

    pub(crate) fn request_body<'a>(&'a self, text: &'a str) -> SynthesizeRequest<'a> {
        SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.config.language_code,
                name: &self.config.voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "LINEAR16",
            },
        }
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn synthesize(&self, text: &str) -> TtsResult<Vec<u8>> {
        let mut request = self
            .http
            .post(self.config.synthesize_url())
            .json(&self.request_body(text));
        request = match &self.credentials {
            Credentials::ApiKey(key) => request.query(&[("key", key.as_str())]),
            Credentials::AccessToken(token) => request.bearer_auth(token),
        };

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(TtsError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        decode_audio(&body)
    }
}

/// Extracts the human-readable message from an API error body.
pub(crate) fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.status.is_empty() => {
            format!("{} ({})", parsed.error.message, parsed.error.status)
        }
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

/// Decodes the base64 `audioContent` of a synthesize response.
pub(crate) fn decode_audio(body: &str) -> TtsResult<Vec<u8>> {
    let parsed: SynthesizeResponse = serde_json::from_str(body)
        .map_err(|e| TtsError::bad_response(format!("invalid JSON: {}", e)))?;
    let content = parsed
        .audio_content
        .ok_or_else(|| TtsError::bad_response("missing audioContent"))?;
    Ok(STANDARD.decode(content)?)
}
