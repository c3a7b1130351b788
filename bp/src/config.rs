//! DD-Agent configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::domain::QuestionnaireSnapshot;

/// Main DD-Agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion provider configuration
    pub llm: LlmConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Blueprint gating configuration
    pub gating: GatingConfig,

    /// Goal vocabulary configuration
    pub goals: GoalsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the credential environment variable is set. Call this
    /// early in startup to fail fast with a clear message instead of
    /// surfacing the error mid-conversation.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).map(|v| v.is_empty()).unwrap_or(true) {
            return Err(eyre::eyre!(
                "Completion API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .ddagent.yml
        let local_config = PathBuf::from(".ddagent.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/ddagent/ddagent.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ddagent").join("ddagent.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gateway" supported)
    pub provider: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Gateway base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Completion endpoint path
    #[serde(rename = "completion-path")]
    pub completion_path: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gateway".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "http://127.0.0.1:3000".to_string(),
            completion_path: "/api/generate".to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Full completion endpoint URL
    pub fn completion_endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.completion_path)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the session slot store
    #[serde(rename = "session-dir")]
    pub session_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/ddagent on Linux)
        let session_dir = dirs::data_dir()
            .map(|d| d.join("ddagent").join("session"))
            .unwrap_or_else(|| PathBuf::from(".ddagent-session"))
            .to_string_lossy()
            .into_owned();

        Self { session_dir }
    }
}

/// Blueprint gating configuration
///
/// The source evolved several mandatory-field lists; the exact set is
/// configuration rather than a hard-coded contract. The default is the
/// fullest variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingConfig {
    /// Questionnaire fields (camelCase keys) that must be answered before a
    /// blueprint may be requested
    #[serde(rename = "mandatory-fields")]
    pub mandatory_fields: Vec<String>,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            mandatory_fields: [
                "age",
                "biologicalSex",
                "height",
                "weight",
                "sleepQuality",
                "sleepConsistency",
                "activityLevel",
                "primaryGoal",
                "goals",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl GatingConfig {
    /// Whether the snapshot satisfies the mandatory-field predicate
    pub fn is_satisfied(&self, snapshot: &QuestionnaireSnapshot) -> bool {
        self.mandatory_fields.iter().all(|field| {
            match snapshot.field_is_empty(field) {
                Some(empty) => !empty,
                None => {
                    warn!(field = %field, "is_satisfied: unknown mandatory field, treating as unanswered");
                    false
                }
            }
        })
    }
}

/// Goal vocabulary configuration
///
/// The source carried both short tag ids and descriptive labels across its
/// iterations; the descriptive labels are canonical here, and the list is
/// overridable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalsConfig {
    /// Accepted goal labels
    pub vocabulary: Vec<String>,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            vocabulary: [
                "Get Healthier Overall",
                "Lose Weight",
                "Improve Sleep",
                "Increase Energy",
                "Build Muscle",
                "Extend Lifespan",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl GoalsConfig {
    /// Whether a goal label is part of the configured vocabulary
    pub fn is_known(&self, goal: &str) -> bool {
        self.vocabulary.iter().any(|g| g == goal)
    }
}
