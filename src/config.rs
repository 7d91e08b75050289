//! Configuration for the orchestration core.
//!
//! Every section deserializes with `#[serde(default)]`, so a partial TOML
//! file (or no file at all) yields working defaults. The constants here are
//! policy: history windows, the previous-restart threshold, the per-provider
//! timeout, and the catalog result cap.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{MuseError, Result};
use crate::llm::{CompletionPipeline, HttpCompletionClient};
use crate::music::{HttpCatalogClient, HttpExtractionClient, MusicResolver};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseConfig {
    /// Chat and history settings.
    pub chat: ChatConfig,
    /// Completion provider settings.
    pub llm: LlmConfig,
    /// Music provider settings.
    pub music: MusicConfig,
}

/// Chat and history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Bounded history window for text completion requests.
    pub history_window: usize,
    /// Reduced window when an image is attached.
    pub history_window_with_image: usize,
    /// Elapsed-seconds threshold past which `previous()` restarts the
    /// current track instead of stepping back.
    pub previous_restart_threshold_seconds: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            history_window_with_image: 5,
            previous_restart_threshold_seconds: 3.0,
        }
    }
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat-completions base URL.
    pub api_url: String,
    /// API key; empty means unauthenticated (local endpoints).
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_owned(),
            api_key: String::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Music provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Search-and-extract endpoint base URL.
    pub extraction_url: String,
    /// Catalog search endpoint base URL.
    pub catalog_url: String,
    /// Maximum catalog results per query.
    pub catalog_limit: usize,
    /// Per-provider-attempt timeout in seconds.
    pub provider_timeout_secs: u64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            extraction_url: "https://extract.museapp.io".to_owned(),
            catalog_url: "https://catalog.museapp.io".to_owned(),
            catalog_limit: 5,
            provider_timeout_secs: 30,
        }
    }
}

impl MuseConfig {
    /// Load configuration from a TOML file. A missing file yields defaults;
    /// an unreadable or invalid file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MuseError::Config(format!("failed to read config ({}): {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            MuseError::Config(format!("invalid config ({}): {e}", path.display()))
        })
    }

    /// Save configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| MuseError::Config(format!("config serialization failed: {e}")))?;
        std::fs::write(path, raw).map_err(|e| {
            MuseError::Config(format!("failed to write config ({}): {e}", path.display()))
        })
    }

    /// Build the music resolver from this configuration.
    pub fn build_resolver(&self) -> Result<MusicResolver> {
        let timeout = Duration::from_secs(self.music.provider_timeout_secs);
        let extraction = HttpExtractionClient::new(self.music.extraction_url.clone(), timeout)?;
        let catalog = HttpCatalogClient::new(self.music.catalog_url.clone(), timeout)?;
        Ok(MusicResolver::new(
            Arc::new(extraction),
            Arc::new(catalog),
            self.music.catalog_limit,
        ))
    }

    /// Build the completion pipeline from this configuration.
    pub fn build_pipeline(&self) -> Result<CompletionPipeline> {
        let client = HttpCompletionClient::new(
            self.llm.api_key.clone(),
            Duration::from_secs(self.llm.request_timeout_secs),
        )?
        .with_base_url(self.llm.api_url.clone());
        Ok(CompletionPipeline::new(Arc::new(client)).with_windows(
            self.chat.history_window,
            self.chat.history_window_with_image,
        ))
    }
}
