use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub openai: OpenAIConfig,
    pub polling: PollingConfig,
    pub cors: CorsConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OpenAIConfig {
    pub api_key: Option<String>,
    pub assistant_id: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: None,
            base_url: None,
            request_timeout_secs: 60,
        }
    }
}

impl OpenAIConfig {
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.api_key.as_deref()).ok_or_else(|| {
            ConfigError::Message(
                "No OpenAI API key configured. Set OPENAI_API_KEY or [openai] api_key.".to_string(),
            )
        })
    }

    pub fn assistant_id(&self) -> Result<&str, ConfigError> {
        non_empty(self.assistant_id.as_deref()).ok_or_else(|| {
            ConfigError::Message(
                "No assistant configured. Set ASSISTANT_ID or [openai] assistant_id.".to_string(),
            )
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "GET,OPTIONS,PATCH,DELETE,POST,PUT".to_string(),
            allow_headers: "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
                            Content-Length, Content-MD5, Content-Type, Date, X-Api-Version, \
                            X-Session-Id"
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub header_name: String,
    /// Sessions unused for this long are forgotten
    pub idle_ttl_secs: u64,
    /// Upper bound on tracked sessions; the least recently seen goes first
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "chatrelay_session".to_string(),
            header_name: "X-Session-Id".to_string(),
            idle_ttl_secs: 3600,
            max_sessions: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Optional log file; rotated daily next to the given path
    pub file: Option<PathBuf>,
}

impl ApiConfig {
    /// Load configuration from `path` (or the default location), then apply
    /// `CHATRELAY__*` and the well-known `OPENAI_API_KEY` / `ASSISTANT_ID`
    /// environment variables.
    pub fn load(path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Message(format!("Failed to create config directory: {e}"))
                })?;
            }
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(
                Environment::with_prefix("CHATRELAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.expand_paths();

        Ok((config, config_path))
    }

    /// Parse a TOML document without touching the filesystem or environment
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: ApiConfig = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.expand_paths();
        Ok(config)
    }

    /// Apply `OPENAI_API_KEY`, `ASSISTANT_ID` and `OPENAI_BASE_URL` on top of the file values
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty()) {
            self.openai.api_key = Some(key);
        }
        if let Some(id) = lookup("ASSISTANT_ID").filter(|v| !v.is_empty()) {
            self.openai.assistant_id = Some(id);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            self.openai.base_url = Some(url);
        }
    }

    fn expand_paths(&mut self) {
        // Expand tilde in log file path
        if let Some(file) = self.logging.file.as_mut() {
            if file.starts_with("~") {
                if let Some(home) = home::home_dir() {
                    let path_str = file.to_string_lossy();
                    let expanded = path_str.replacen('~', &home.to_string_lossy(), 1);
                    *file = PathBuf::from(expanded);
                }
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("chatrelay/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[openai]
# api_key = "sk-..."          # or set OPENAI_API_KEY
# assistant_id = "asst_..."   # or set ASSISTANT_ID
# base_url = "https://api.openai.com"
request_timeout_secs = 60

[polling]
interval_ms = 1000
max_attempts = 30

[cors]
allow_origin = "*"
allow_methods = "GET,OPTIONS,PATCH,DELETE,POST,PUT"
allow_headers = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version, X-Session-Id"

# Browsers do not send cookies to a wildcard origin. With allow_origin = "*",
# cross-origin clients must send the X-Session-Id header to keep a thread;
# otherwise set allow_origin to the UI's origin.

[session]
cookie_name = "chatrelay_session"
header_name = "X-Session-Id"
idle_ttl_secs = 3600
max_sessions = 10000

[logging]
# file = "~/.local/share/chatrelay/chatrelay.log"
"#;
