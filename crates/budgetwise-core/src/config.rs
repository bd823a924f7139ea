//! Advisor configuration
//!
//! Configuration is resolved in layers:
//! 1. Embedded defaults (`config/default.toml`, compiled into binary)
//! 2. Override file (`--config PATH`, else ~/.local/share/budgetwise/config.toml)
//! 3. Environment variables (a `.env` file in the working directory is loaded first)
//!
//! Override files only need to contain the keys they change.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Which advice provider to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Gemini,
    Ollama,
    #[serde(rename = "openai_compatible")]
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Ok(Self::OpenAICompatible)
            }
            "mock" => Ok(Self::Mock),
            other => Err(Error::Config(format!(
                "Unknown backend '{}' (expected gemini, ollama, openai_compatible or mock)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection settings for one backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointConfig {
    pub host: Option<String>,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl EndpointConfig {
    fn new(host: Option<&str>, model: &str) -> Self {
        Self {
            host: host.map(str::to_string),
            model: model.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderConfig {
    pub backend: BackendKind,
    pub timeout_secs: u64,
    pub temperature: f64,
    pub gemini: EndpointConfig,
    pub ollama: EndpointConfig,
    pub openai_compatible: EndpointConfig,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint settings for the selected backend (`None` for mock)
    pub fn endpoint(&self) -> Option<&EndpointConfig> {
        match self.backend {
            BackendKind::Gemini => Some(&self.gemini),
            BackendKind::Ollama => Some(&self.ollama),
            BackendKind::OpenAICompatible => Some(&self.openai_compatible),
            BackendKind::Mock => None,
        }
    }

    /// Model the selected backend will use
    pub fn model(&self) -> &str {
        self.endpoint().map(|e| e.model.as_str()).unwrap_or("mock")
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Gemini,
            timeout_secs: 60,
            temperature: 0.7,
            gemini: EndpointConfig::new(
                Some("https://generativelanguage.googleapis.com"),
                "gemini-2.0-flash",
            ),
            ollama: EndpointConfig::new(Some("http://localhost:11434"), "llama3.2"),
            openai_compatible: EndpointConfig::new(None, "gpt-3.5-turbo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session_timeout_secs: u64,
}

impl ServerConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_timeout_secs: 30 * 60,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdvisorConfig {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
}

impl AdvisorConfig {
    /// Resolve all layers: embedded, override file, `.env`, environment
    ///
    /// An explicit `path` must exist; the default override location is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_dotenv();

        let mut config = Self::embedded();

        let override_path = match path {
            Some(p) if !p.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )))
            }
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(p) = override_path {
            debug!("Loading config override from {}", p.display());
            let content = fs::read_to_string(&p)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
            config.apply_toml(&content)?;
        }

        config.apply_env();
        Ok(config)
    }

    /// Embedded defaults only
    pub fn embedded() -> Self {
        let mut config = Self::default();
        if let Err(e) = config.apply_toml(DEFAULT_CONFIG) {
            warn!("Embedded config did not parse, using built-in values: {}", e);
        }
        config
    }

    /// Parse a TOML document on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_toml(content)?;
        Ok(config)
    }

    /// Overlay the keys present in a TOML document
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        if let Some(provider) = raw.provider {
            if let Some(backend) = provider.backend {
                self.provider.backend = backend.parse()?;
            }
            if let Some(timeout) = provider.timeout_secs {
                self.provider.timeout_secs = timeout;
            }
            if let Some(temperature) = provider.temperature {
                self.provider.temperature = temperature;
            }
            apply_endpoint(&mut self.provider.gemini, provider.gemini);
            apply_endpoint(&mut self.provider.ollama, provider.ollama);
            apply_endpoint(&mut self.provider.openai_compatible, provider.openai_compatible);
        }

        if let Some(server) = raw.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(timeout) = server.session_timeout_secs {
                self.server.session_timeout_secs = timeout;
            }
        }

        Ok(())
    }

    /// Overlay the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    }

    /// Overlay variables from an arbitrary lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("AI_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.provider.backend = kind,
                Err(e) => warn!(backend = %backend, "Ignoring AI_BACKEND: {}", e),
            }
        }

        let p = &mut self.provider;
        override_from(&mut p.gemini.api_key, lookup("GOOGLE_API_KEY"));
        override_from(&mut p.gemini.host, lookup("GEMINI_HOST"));
        if let Some(model) = lookup("GEMINI_MODEL") {
            p.gemini.model = model;
        }

        override_from(&mut p.ollama.host, lookup("OLLAMA_HOST"));
        if let Some(model) = lookup("OLLAMA_MODEL") {
            p.ollama.model = model;
        }

        override_from(&mut p.openai_compatible.host, lookup("OPENAI_COMPATIBLE_HOST"));
        override_from(
            &mut p.openai_compatible.api_key,
            lookup("OPENAI_COMPATIBLE_API_KEY"),
        );
        if let Some(model) = lookup("OPENAI_COMPATIBLE_MODEL") {
            p.openai_compatible.model = model;
        }
    }
}

/// Load `.env` from the working directory if present
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("budgetwise").join("config.toml"))
}

fn override_from(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

fn apply_endpoint(endpoint: &mut EndpointConfig, raw: Option<RawEndpoint>) {
    let Some(raw) = raw else { return };
    override_from(&mut endpoint.host, raw.host);
    override_from(&mut endpoint.api_key, raw.api_key);
    if let Some(model) = raw.model {
        endpoint.model = model;
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    provider: Option<RawProvider>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    backend: Option<String>,
    timeout_secs: Option<u64>,
    temperature: Option<f64>,
    gemini: Option<RawEndpoint>,
    ollama: Option<RawEndpoint>,
    openai_compatible: Option<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    host: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    session_timeout_secs: Option<u64>,
}
