//! Prompt loader
//!
//! Loads task prompt text from override files or falls back to the
//! embedded defaults.

use std::path::PathBuf;

use eyre::{Result, eyre};
use tracing::debug;

use super::embedded;

/// Loads task prompt templates
///
/// Checks a project-local override directory, then the user config
/// directory, then the embedded defaults.
pub struct PromptLoader {
    /// Project override directory (`.ddagent/prompts/`)
    project_dir: Option<PathBuf>,
    /// User override directory (`~/.config/ddagent/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader using the conventional override directories
    pub fn new() -> Self {
        let project_dir = PathBuf::from(".ddagent/prompts");
        let user_dir = dirs::config_dir().map(|d| d.join("ddagent").join("prompts"));

        Self {
            project_dir: project_dir.exists().then_some(project_dir),
            user_dir: user_dir.filter(|d| d.exists()),
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            project_dir: None,
            user_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Project override: `.ddagent/prompts/{name}.pmt`
    /// 2. User override: `~/.config/ddagent/prompts/{name}.pmt`
    /// 3. Embedded fallback
    pub fn load(&self, name: &str) -> Result<String> {
        for dir in [&self.project_dir, &self.user_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::new()
    }
}
