// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Preference sources for the CT toggle
//!
//! Sources are polled on every client configuration pass; nothing is cached.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, Result};

/// Key of the CT flag in a preference file
pub const CT_PREFERENCE_KEY: &str = "certificate_transparency_enabled";

/// Preference file used by the CLI when none is given
pub const DEFAULT_PREFS_FILE: &str = "ctswitch-prefs.json";

/// Supplies the live "CT enabled" preference
pub trait PreferenceSource: Send + Sync {
    /// Read the current value
    fn certificate_transparency_enabled(&self) -> Result<bool>;
}

/// In-memory preference that can be flipped at runtime
#[derive(Debug, Default)]
pub struct StaticPreference {
    enabled: AtomicBool,
}

impl StaticPreference {
    /// Create with an initial value
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Change the value
    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

impl PreferenceSource for StaticPreference {
    fn certificate_transparency_enabled(&self) -> Result<bool> {
        Ok(self.enabled.load(Ordering::Acquire))
    }
}

/// On-disk preference document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceFile {
    #[serde(default)]
    pub certificate_transparency_enabled: bool,
}

/// Reads the preference from a JSON file on every poll
///
/// A missing file reads as disabled. An unreadable or malformed file is an
/// error.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    /// Poll the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole document
    pub fn load(&self) -> Result<PreferenceFile> {
        let source = self.path.display().to_string();
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PreferenceFile::default())
            }
            Err(e) => return Err(e).preference_context(&source),
        };
        serde_json::from_str(&raw).preference_context(&source)
    }

    /// Write the CT flag, keeping the file pretty-printed
    pub fn store(&self, enabled: bool) -> Result<()> {
        let mut prefs = self.load()?;
        prefs.certificate_transparency_enabled = enabled;
        let json = serde_json::to_string_pretty(&prefs)?;
        std::fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), enabled, "Stored CT preference");
        Ok(())
    }
}

impl PreferenceSource for JsonFilePreferences {
    fn certificate_transparency_enabled(&self) -> Result<bool> {
        Ok(self.load()?.certificate_transparency_enabled)
    }
}
