//! Transcription collaborator.

use crate::error::Result;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Converts a finalized recording (complete WAV bytes) into text.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav_bytes: Vec<u8>) -> Result<String>;
}

/// HTTP client for the agent server's `POST {base}/{agent_id}/whisper` route.
///
/// Uploads the recording as multipart form field `file` named `audio.wav`.
pub struct WhisperTranscriptionClient {
    base_url: String,
    agent_id: String,
    client: reqwest::Client,
}

impl WhisperTranscriptionClient {
    pub fn new(base_url: String, agent_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            base_url,
            agent_id,
            client,
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperTranscriptionClient {
    async fn transcribe(&self, wav_bytes: Vec<u8>) -> Result<String> {
        let url = format!("{}/{}/whisper", self.base_url, self.agent_id);
        debug!(%url, bytes = wav_bytes.len(), "Uploading recording for transcription");

        let part = reqwest::multipart::Part::bytes(wav_bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let transcription: TranscriptionResponse = response.json().await?;
        debug!(chars = transcription.text.len(), "Transcription received");

        Ok(transcription.text)
    }
}
