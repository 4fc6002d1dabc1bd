//! Speech-synthesis collaborator.

use crate::error::Result;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Turns reply text into raw audio bytes (PCM16, 16 kHz).
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// HTTP client for an ElevenLabs-style text-to-speech endpoint.
///
/// `POST {base}/v1/text-to-speech/{voice_id}?output_format=pcm_16000` with a
/// header-based API key; the response body is the raw PCM buffer.
pub struct ElevenLabsSynthesizer {
    base_url: String,
    api_key: String,
    voice_id: String,
    model_id: String,
    client: reqwest::Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(
        base_url: String,
        api_key: String,
        voice_id: String,
        model_id: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            voice_id,
            model_id,
            client,
        })
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        debug!(%url, chars = text.len(), "Sending synthesis request");

        let response = self
            .client
            .post(&url)
            .query(&[("output_format", "pcm_16000")])
            .header("xi-api-key", &self.api_key)
            .json(&SynthesisRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .await?
            .error_for_status()?;

        let audio = response.bytes().await?.to_vec();
        debug!(bytes = audio.len(), "Synthesis response received");

        Ok(audio)
    }
}
