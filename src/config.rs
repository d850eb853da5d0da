use crate::notify::TELEGRAM_API;
use crate::report::tier::DEFAULT_MILESTONES;
use crate::stats::DEFAULT_HISTORY_LIMIT;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub plugin: PluginConfig,
    pub store: StoreConfig,
    pub document: DocumentConfig,
    pub report: ReportConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PluginConfig {
    pub id: String,
    pub display_name: String,
    pub stats_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub history_path: String,
    pub summary_path: String,
    pub history_limit: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DocumentConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub milestones: Vec<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_base: String,
    pub chat_id: Option<String>,
    /// Normally supplied through the environment, never written back out.
    #[serde(skip_serializing)]
    pub bot_token: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            id: "nexus-ai-chat-importer".to_string(),
            display_name: "Nexus AI Chat Importer".to_string(),
            stats_url: "https://github.com/obsidianmd/obsidian-releases/raw/master/community-plugin-stats.json"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_path: "daily-stats.json".to_string(),
            summary_path: "summary.json".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "README.md".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            milestones: DEFAULT_MILESTONES.to_vec(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: TELEGRAM_API.to_string(),
            chat_id: None,
            bot_token: None,
        }
    }
}

#[derive(Deserialize)]
struct PartialConfig {
    plugin: Option<PartialPluginConfig>,
    store: Option<PartialStoreConfig>,
    document: Option<PartialDocumentConfig>,
    report: Option<PartialReportConfig>,
    telegram: Option<PartialTelegramConfig>,
}

#[derive(Deserialize)]
struct PartialPluginConfig {
    id: Option<String>,
    display_name: Option<String>,
    stats_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
struct PartialStoreConfig {
    history_path: Option<String>,
    summary_path: Option<String>,
    history_limit: Option<usize>,
}

#[derive(Deserialize)]
struct PartialDocumentConfig {
    enabled: Option<bool>,
    path: Option<String>,
}

#[derive(Deserialize)]
struct PartialReportConfig {
    milestones: Option<Vec<u64>>,
}

#[derive(Deserialize)]
struct PartialTelegramConfig {
    api_base: Option<String>,
    chat_id: Option<String>,
}

impl PluginConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Defaults, then `<config_dir>/plugstat/config.toml`, then `./.plugstat.toml`,
    /// then Telegram credentials from the environment.
    pub fn load() -> Result<Self> {
        let global = dirs::config_dir()
            .map(|dir| dir.join("plugstat/config.toml"))
            .and_then(|path| read_layer(&path));
        let local = read_layer(Path::new(".plugstat.toml"));

        let mut config = Self::from_layers(global.as_deref(), local.as_deref());
        config.apply_env(
            std::env::var(BOT_TOKEN_ENV).ok(),
            std::env::var(CHAT_ID_ENV).ok(),
        );
        Ok(config)
    }

    /// Layers TOML documents over the defaults. A layer that does not parse is skipped.
    pub fn from_layers(global: Option<&str>, local: Option<&str>) -> Self {
        let mut config = Config::default();

        if let Some(content) = global {
            match toml::from_str::<Config>(content) {
                Ok(global_config) => config = global_config,
                Err(e) => tracing::warn!(error = %e, "ignoring malformed global config"),
            }
        }

        if let Some(content) = local {
            match toml::from_str::<PartialConfig>(content) {
                Ok(partial) => config.merge(partial),
                Err(e) => tracing::warn!(error = %e, "ignoring malformed local config"),
            }
        }

        config
    }

    pub fn apply_env(&mut self, bot_token: Option<String>, chat_id: Option<String>) {
        if let Some(token) = bot_token.filter(|t| !t.is_empty()) {
            self.telegram.bot_token = Some(token);
        }
        if let Some(chat) = chat_id.filter(|c| !c.is_empty()) {
            self.telegram.chat_id = Some(chat);
        }
    }

    fn merge(&mut self, partial: PartialConfig) {
        if let Some(p) = partial.plugin {
            if let Some(id) = p.id {
                self.plugin.id = id;
            }
            if let Some(name) = p.display_name {
                self.plugin.display_name = name;
            }
            if let Some(url) = p.stats_url {
                self.plugin.stats_url = url;
            }
            if let Some(secs) = p.timeout_secs {
                self.plugin.timeout_secs = secs;
            }
        }
        if let Some(s) = partial.store {
            if let Some(path) = s.history_path {
                self.store.history_path = path;
            }
            if let Some(path) = s.summary_path {
                self.store.summary_path = path;
            }
            if let Some(limit) = s.history_limit {
                self.store.history_limit = limit;
            }
        }
        if let Some(d) = partial.document {
            if let Some(enabled) = d.enabled {
                self.document.enabled = enabled;
            }
            if let Some(path) = d.path {
                self.document.path = path;
            }
        }
        if let Some(r) = partial.report {
            if let Some(mut milestones) = r.milestones {
                milestones.sort_unstable();
                milestones.dedup();
                self.report.milestones = milestones;
            }
        }
        if let Some(t) = partial.telegram {
            if let Some(base) = t.api_base {
                self.telegram.api_base = base;
            }
            if let Some(chat) = t.chat_id {
                self.telegram.chat_id = Some(chat);
            }
        }
    }
}

fn read_layer(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config");
            None
        }
    }
}
