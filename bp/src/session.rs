//! Session state layer
//!
//! Exclusive owner of the durable session slots: the questionnaire answers,
//! the last blueprint result, and the UI theme. Other components mutate
//! them only through these accessors, which persist on every write.

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use sessionstore::SlotStore;

use crate::config::GatingConfig;
use crate::domain::{BlueprintResult, QuestionnaireSnapshot};

/// Slot holding the questionnaire answers
pub const FORM_DATA_SLOT: &str = "formData";
/// Slot holding the last blueprint result
pub const BLUEPRINT_SLOT: &str = "blueprintResponse";
/// Slot holding the UI theme
pub const THEME_SLOT: &str = "theme";

/// UI theme persisted alongside the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Snapshot and result loaded from the session, independently optional
#[derive(Debug, Default)]
pub struct LoadedSession {
    pub snapshot: Option<QuestionnaireSnapshot>,
    pub result: Option<BlueprintResult>,
}

/// Durable session state backed by a slot store
pub struct SessionState {
    store: SlotStore,
}

impl SessionState {
    /// Open or create the session at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "open: called");
        Ok(Self {
            store: SlotStore::open(path)?,
        })
    }

    /// Load whatever the session holds
    ///
    /// Both slots are independently optional; unreadable data is absent
    /// data, never an error.
    pub fn load(&self) -> LoadedSession {
        LoadedSession {
            snapshot: self.snapshot(),
            result: self.result(),
        }
    }

    /// The stored questionnaire answers, if any
    pub fn snapshot(&self) -> Option<QuestionnaireSnapshot> {
        self.read_soft(FORM_DATA_SLOT)
    }

    /// The stored blueprint result, if any
    pub fn result(&self) -> Option<BlueprintResult> {
        self.read_soft(BLUEPRINT_SLOT)
    }

    /// Persist the questionnaire answers
    pub fn save_snapshot(&self, snapshot: &QuestionnaireSnapshot) -> Result<()> {
        debug!("save_snapshot: called");
        self.store.put(FORM_DATA_SLOT, snapshot)
    }

    /// Persist a blueprint result, fully replacing any prior one
    pub fn save_result(&self, result: &BlueprintResult) -> Result<()> {
        debug!(is_error = %result.is_error(), "save_result: called");
        self.store.put(BLUEPRINT_SLOT, result)
    }

    /// The stored theme, defaulting to light
    pub fn theme(&self) -> Theme {
        self.read_soft(THEME_SLOT).unwrap_or_default()
    }

    /// Persist the theme
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.put(THEME_SLOT, &theme)
    }

    /// Delete the questionnaire answers
    pub fn clear_snapshot(&self) -> Result<()> {
        self.store.delete(FORM_DATA_SLOT)?;
        Ok(())
    }

    /// Delete the blueprint result
    pub fn clear_result(&self) -> Result<()> {
        self.store.delete(BLUEPRINT_SLOT)?;
        Ok(())
    }

    /// Delete everything the session holds
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    /// Gating rule for load-time generation
    ///
    /// True iff the stored answers satisfy the mandatory-field predicate
    /// and no result slot is populated. A result that is already present -
    /// even an error-shaped one - suppresses regeneration until the user
    /// asks for it.
    pub fn should_auto_generate(&self, gating: &GatingConfig) -> bool {
        let Some(snapshot) = self.snapshot() else {
            debug!("should_auto_generate: no stored answers");
            return false;
        };

        if self.result().is_some() {
            debug!("should_auto_generate: result slot already populated");
            return false;
        }

        gating.is_satisfied(&snapshot)
    }

    fn read_soft<T: serde::de::DeserializeOwned>(&self, slot: &str) -> Option<T> {
        match self.store.get(slot) {
            Ok(value) => value,
            Err(e) => {
                warn!(slot, error = %e, "read_soft: failed to read slot, treating as absent");
                None
            }
        }
    }
}
