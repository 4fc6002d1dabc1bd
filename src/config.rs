use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub completion: CompletionConfig,
    pub synthesis: SynthesisConfig,
    pub avatar: AvatarConfig,
    pub capture: CaptureConfig,
    pub profile: ProfileConfig,
}

#[derive(Debug, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the agent server, e.g. "http://localhost:3000"
    pub base_url: String,
    /// Agent identifier appended to the message/whisper routes
    pub agent_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SynthesisConfig {
    /// Base URL of the speech-synthesis service
    pub base_url: String,
    pub api_key: String,
    pub voice_id: String,
    /// Synthesis model, e.g. "eleven_turbo_v2_5"
    pub model_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AvatarConfig {
    pub api_key: String,
    pub face_id: String,
    pub handle_silence: bool,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    /// Recorder sample rate in Hz (mono PCM16)
    pub sample_rate: u32,
}

#[derive(Debug, Deserialize)]
pub struct ProfileConfig {
    /// Where the persisted room/user identity lives
    pub path: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
