pub mod extract;
pub mod stride;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// --- Types ---

/// A directed, labeled interaction between two named graph nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flow {
    pub source: String,
    pub target: String,
    pub label: String,
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}: {}", self.source, self.target, self.label)
    }
}

/// The per-run model of the described system: external actors, internal
/// components, and the flows annotating the edges between them.
///
/// Actor and component lists are insertion-ordered and deduplicated by
/// name. Component order matters: it defines the sequential chain used
/// for flow inference and diagram edge routing.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Graph {
    pub actors: Vec<String>,
    pub components: Vec<String>,
    pub flows: Vec<Flow>,
}

impl Graph {
    /// True when `name` is an actor or component of this graph.
    pub fn has_node(&self, name: &str) -> bool {
        self.actors.iter().any(|a| a == name) || self.components.iter().any(|c| c == name)
    }
}

/// A single STRIDE finding tied to one component by name.
///
/// `category` stays a plain string on the wire: the deterministic
/// synthesizer only writes the fixed STRIDE labels, but the delegated
/// strategy may hand back "Unknown" or a label of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Threat {
    pub title: String,
    pub category: String,
    pub component: String,
    pub description: String,
}

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

/// Resolve the global config directory (~/.omen/).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".omen")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn read_settings() -> AiSettings {
    let path = settings_path();
    if !path.exists() {
        return AiSettings::default();
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_settings(settings: &AiSettings) -> Result<(), String> {
    let dir = config_dir();
    fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    fs::write(settings_path(), json).map_err(|e| e.to_string())
}

/// Settings are usable when a provider and model are set. Ollama is the
/// only provider that runs without an API key.
pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
