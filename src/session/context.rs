use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Durable per-profile session identity.
///
/// Generated once, persisted, and immutable afterwards; every completion
/// request carries these identifiers so the agent server keeps the
/// conversation's context across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub room_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    /// Read the persisted identity from `path`, or generate a fresh one and
    /// persist it.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read session profile: {:?}", path))?;
            let context: SessionContext = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse session profile: {:?}", path))?;

            info!(room_id = %context.room_id, "Loaded existing session profile");
            return Ok(context);
        }

        let context = SessionContext {
            room_id: Uuid::new_v4().to_string(),
            user_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create profile directory: {:?}", parent))?;
        }
        fs::write(path, serde_json::to_string_pretty(&context)?)
            .with_context(|| format!("Failed to write session profile: {:?}", path))?;

        info!(room_id = %context.room_id, "Generated new session profile");
        Ok(context)
    }
}
