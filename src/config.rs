//! Settings loading and persistence
//!
//! The user-maintained process list, the two hotkey bindings, and the
//! launch-at-startup flag live in a JSON file under the platform
//! config directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hotkey::{HotkeyBindings, KeyDescriptor};

/// Default minimize binding
pub const DEFAULT_MINIMIZE_HOTKEY: &str = "Ctrl+G";
/// Default restore binding
pub const DEFAULT_RESTORE_HOTKEY: &str = "Ctrl+H";

/// Persisted daemon settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Executable names whose windows the hotkeys act on
    pub processes: Vec<String>,

    /// Binding that minimizes matching windows
    pub minimize_hotkey: String,

    /// Binding that restores matching windows
    pub restore_hotkey: String,

    /// Register the daemon under the HKCU Run key
    pub launch_at_startup: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            processes: Vec::new(),
            minimize_hotkey: DEFAULT_MINIMIZE_HOTKEY.to_string(),
            restore_hotkey: DEFAULT_RESTORE_HOTKEY.to_string(),
            launch_at_startup: false,
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("no config directory for this platform")?;
        Ok(dir.join("minimizer").join("settings.json"))
    }

    /// Load from the default path; a missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("malformed settings file {}", path.display()))
    }

    /// Save to the default path, creating parent directories
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write settings to {}", path.display()))
    }

    /// Add a process name, rejecting empty input and case-insensitive
    /// duplicates; returns whether the list changed
    pub fn add_process(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty()
            || self
                .processes
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(name))
        {
            return false;
        }
        self.processes.push(name.to_string());
        true
    }

    /// Remove a process name case-insensitively; returns whether the
    /// list changed
    pub fn remove_process(&mut self, name: &str) -> bool {
        let before = self.processes.len();
        self.processes
            .retain(|existing| !existing.eq_ignore_ascii_case(name));
        self.processes.len() != before
    }

    /// Parse both persisted bindings into the pair the hotkey registry
    /// registers
    pub fn bindings(&self) -> Result<HotkeyBindings> {
        let minimize = KeyDescriptor::parse(&self.minimize_hotkey)
            .with_context(|| format!("invalid minimize hotkey '{}'", self.minimize_hotkey))?;
        let restore = KeyDescriptor::parse(&self.restore_hotkey)
            .with_context(|| format!("invalid restore hotkey '{}'", self.restore_hotkey))?;
        Ok(HotkeyBindings { minimize, restore })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::Key;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.processes.is_empty());
        assert_eq!(settings.minimize_hotkey, "Ctrl+G");
        assert_eq!(settings.restore_hotkey, "Ctrl+H");
        assert!(!settings.launch_at_startup);
    }

    #[test]
    fn test_default_bindings_parse() {
        let bindings = Settings::default().bindings().unwrap();
        assert_eq!(bindings.minimize.key, Key::Char('G'));
        assert_eq!(bindings.restore.key, Key::Char('H'));
        assert!(bindings.minimize.modifiers.ctrl);
    }

    #[test]
    fn test_invalid_binding_is_an_error() {
        let settings = Settings {
            minimize_hotkey: "Ctrl+".to_string(),
            ..Default::default()
        };
        assert!(settings.bindings().is_err());
    }

    #[test]
    fn test_add_process_rejects_case_insensitive_duplicates() {
        let mut settings = Settings::default();
        assert!(settings.add_process("notepad.exe"));
        assert!(!settings.add_process("NOTEPAD.EXE"));
        assert!(!settings.add_process("  "));
        assert_eq!(settings.processes, vec!["notepad.exe"]);
    }

    #[test]
    fn test_remove_process_is_case_insensitive() {
        let mut settings = Settings::default();
        settings.add_process("notepad.exe");
        assert!(settings.remove_process("Notepad.EXE"));
        assert!(!settings.remove_process("notepad.exe"));
        assert!(settings.processes.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.add_process("notepad.exe");
        settings.minimize_hotkey = "Ctrl+Shift+F5".to_string();
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"processes":["notepad.exe"]}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.processes, vec!["notepad.exe"]);
        assert_eq!(settings.minimize_hotkey, "Ctrl+G");
    }
}
