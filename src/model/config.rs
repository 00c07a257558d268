use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::field::FieldKind;

/// Configuration from multifield.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Placeholder overrides keyed by field kind tag (e.g. `emails = "Work email"`)
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Config {
    /// Placeholder text for a kind, honoring `[labels]`
    pub fn placeholder(&self, kind: FieldKind) -> &str {
        self.labels
            .get(kind.as_str())
            .map(|s| s.as_str())
            .unwrap_or_else(|| kind.placeholder())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Run the built-in validator for each field kind on submit
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Calling code applied to phone numbers typed without a `+` prefix
    #[serde(default = "default_calling_code")]
    pub default_calling_code: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            validate: true,
            default_calling_code: default_calling_code(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_calling_code() -> String {
    "+1".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Kitty keyboard protocol: true = force on, false = force off, absent = on.
    #[serde(default)]
    pub kitty_keyboard: Option<bool>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            kitty_keyboard: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Where the TUI writes its log. The CLI always logs to stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `MF_LOG`
    #[serde(default)]
    pub filter: Option<String>,
}
