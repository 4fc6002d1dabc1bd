use anyhow::Result;
use clap::Parser;
use simli_session::{
    AgentCompletionClient, AvatarEngine, Config, ConnectionController, ElevenLabsSynthesizer,
    EngineConfig, LoggingEngine, RequestPipeline, SessionContext, SessionStatus,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Conversational avatar session orchestrator.
///
/// Runs a text chat loop against the configured agent server and streams
/// synthesized replies into the avatar engine (a logging stand-in here; the
/// real engine lives outside this process).
#[derive(Parser)]
#[command(name = "simli-session")]
struct Cli {
    /// Config file name without extension, e.g. config/simli-session
    #[arg(long, default_value = "config/simli-session")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Simli Session v0.1.0");
    info!("Completion endpoint: {}", cfg.completion.base_url);
    info!("Agent: {}", cfg.completion.agent_id);

    let context = SessionContext::load_or_create(Path::new(&cfg.profile.path))?;
    info!("Room: {} User: {}", context.room_id, context.user_id);

    let status = SessionStatus::new();
    let engine: Arc<dyn AvatarEngine> = Arc::new(LoggingEngine::new(EngineConfig {
        api_key: cfg.avatar.api_key.clone(),
        face_id: cfg.avatar.face_id.clone(),
        handle_silence: cfg.avatar.handle_silence,
    }));

    let controller = ConnectionController::new(Arc::clone(&engine), status.clone());
    controller.start().await;

    let completion = Arc::new(AgentCompletionClient::new(
        cfg.completion.base_url.clone(),
        cfg.completion.agent_id.clone(),
    )?);
    let synthesizer = Arc::new(ElevenLabsSynthesizer::new(
        cfg.synthesis.base_url.clone(),
        cfg.synthesis.api_key.clone(),
        cfg.synthesis.voice_id.clone(),
        cfg.synthesis.model_id.clone(),
    )?);
    let pipeline = RequestPipeline::new(completion, synthesizer, engine, context, status.clone());

    info!("Type a message and press enter (ctrl-d to quit)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcome = loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                pipeline.submit(&line).await;
                if let Some(message) = status.error() {
                    eprintln!("{message}");
                }
            }
            Ok(None) => break Ok(()),
            // Still tear the connection down before surfacing the error
            Err(err) => break Err(err),
        }
    };

    controller.close().await;
    outcome?;
    Ok(())
}
