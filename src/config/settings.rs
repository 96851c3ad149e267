//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// EditorConfig
// ---------------------------------------------------------------------------

/// Settings for the chapter editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Whether debounced auto-saving is active at all.
    pub autosave_enabled: bool,
    /// Quiet period before an auto-save fires, in seconds.
    ///
    /// Sessions clamp this to 5-120 s; the raw value round-trips through
    /// the settings file unchanged.
    pub autosave_interval_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            autosave_interval_secs: 30,
        }
    }
}

impl EditorConfig {
    /// The configured interval as a [`Duration`].
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}

// ---------------------------------------------------------------------------
// AiConfig
// ---------------------------------------------------------------------------

/// Settings for the AI text-generation gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Whether AI assistance (suggestions, character chat) is offered.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible endpoint.
    pub base_url: String,
    /// API key; `None` for local providers that need no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 - 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Settings for the persistence service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the persistence API.
    pub base_url: String,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the dictation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Keep listening across utterances, restarting when the underlying
    /// capability ends on its own.
    pub continuous: bool,
    /// Delay before an automatic restart, in milliseconds.
    pub restart_delay_ms: u64,
    /// Recognition language as a BCP-47 tag.
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            restart_delay_ms: 300,
            language: "en-US".into(),
        }
    }
}

impl SpeechConfig {
    /// The configured restart delay as a [`Duration`].
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use storyloom::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Editing session settings.
    pub editor: EditorConfig,
    /// AI gateway settings.
    pub ai: AiConfig,
    /// Persistence service settings.
    pub store: StoreConfig,
    /// Dictation settings.
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns `true` when no `settings.toml` file exists yet.
    pub fn is_first_run() -> bool {
        !AppPaths::new().settings_file.exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(
            original.editor.autosave_enabled,
            loaded.editor.autosave_enabled
        );
        assert_eq!(
            original.editor.autosave_interval_secs,
            loaded.editor.autosave_interval_secs
        );
        assert_eq!(original.ai.base_url, loaded.ai.base_url);
        assert_eq!(original.ai.api_key, loaded.ai.api_key);
        assert_eq!(original.ai.model, loaded.ai.model);
        assert_eq!(original.ai.timeout_secs, loaded.ai.timeout_secs);
        assert_eq!(original.store.base_url, loaded.store.base_url);
        assert_eq!(original.store.timeout_secs, loaded.store.timeout_secs);
        assert_eq!(original.speech.continuous, loaded.speech.continuous);
        assert_eq!(
            original.speech.restart_delay_ms,
            loaded.speech.restart_delay_ms
        );
        assert_eq!(original.speech.language, loaded.speech.language);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(
            config.editor.autosave_interval_secs,
            default.editor.autosave_interval_secs
        );
        assert_eq!(config.ai.model, default.ai.model);
        assert_eq!(config.store.base_url, default.store.base_url);
        assert_eq!(config.speech.language, default.speech.language);
    }

    /// Verify default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.editor.autosave_enabled);
        assert_eq!(cfg.editor.autosave_interval_secs, 30);
        assert_eq!(
            cfg.editor.autosave_interval(),
            Duration::from_secs(30)
        );
        assert!(cfg.ai.enabled);
        assert_eq!(cfg.ai.base_url, "https://api.openai.com");
        assert!(cfg.ai.api_key.is_none());
        assert_eq!(cfg.ai.timeout_secs, 30);
        assert_eq!(cfg.store.timeout_secs, 30);
        assert!(cfg.speech.continuous);
        assert_eq!(cfg.speech.restart_delay(), Duration::from_millis(300));
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.editor.autosave_enabled = false;
        cfg.editor.autosave_interval_secs = 90;
        cfg.ai.base_url = "http://localhost:11434".into();
        cfg.ai.api_key = Some("sk-test".into());
        cfg.ai.model = "qwen2.5:3b".into();
        cfg.store.base_url = "https://stories.example.com/api".into();
        cfg.speech.continuous = false;
        cfg.speech.restart_delay_ms = 500;
        cfg.speech.language = "de-DE".into();

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert!(!loaded.editor.autosave_enabled);
        assert_eq!(loaded.editor.autosave_interval_secs, 90);
        assert_eq!(loaded.ai.base_url, "http://localhost:11434");
        assert_eq!(loaded.ai.api_key, Some("sk-test".into()));
        assert_eq!(loaded.ai.model, "qwen2.5:3b");
        assert_eq!(loaded.store.base_url, "https://stories.example.com/api");
        assert!(!loaded.speech.continuous);
        assert_eq!(loaded.speech.restart_delay_ms, 500);
        assert_eq!(loaded.speech.language, "de-DE");
    }
}
