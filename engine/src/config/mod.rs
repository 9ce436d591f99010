//! Configuration management
//!
//! This module handles loading, validation, and management of the Strand configuration.
//! Configuration is stored in TOML format at ~/.strand/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **memory**: Conversation memory window
//! - **execution**: Optional per-tool timeout
//! - **tools**: Built-in tools to register
//! - **steps**: Ordered workflow steps (`[[steps]]` array of tables)
//!
//! # Examples
//!
//! ```no_run
//! use strand_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Memory window: {}", config.memory.window);
//! println!("Steps: {}", config.steps.len());
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tools::builtin::BUILTIN_TOOL_NAMES;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Conversation memory settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Step execution settings
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Built-in tool enablement
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Workflow steps, in execution order
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Conversation memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum retained entries (not pairs)
    #[serde(default = "default_memory_window")]
    pub window: usize,
}

/// Step execution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Timeout for a single tool call in seconds; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_timeout_secs: Option<u64>,
}

/// Built-in tools configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Names of built-in tools to register (echo, clock, word_count)
    #[serde(default = "default_enabled_tools")]
    pub enabled: Vec<String>,
}

/// A single workflow step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    pub name: String,

    /// Prompt template with `{{ input }}`, `{{ memory }}`, `{{ metadata }}`
    /// and `{{ toolResults }}` placeholders
    pub template: String,

    /// Tool to invoke with the formatted prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window: default_memory_window(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_tools(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_memory_window() -> usize {
    crate::memory::DEFAULT_MEMORY_WINDOW
}

fn default_enabled_tools() -> Vec<String> {
    BUILTIN_TOOL_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from the default location (~/.strand/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default_config();
        config.validate()?;

        fs::write(path, config.to_toml_string()?)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.strand/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".strand").join("config.toml"))
    }

    /// Default configuration: an observe step bound to `echo`, then an answer step
    pub fn default_config() -> Self {
        Self {
            core: CoreConfig::default(),
            memory: MemoryConfig::default(),
            execution: ExecutionConfig::default(),
            tools: ToolsConfig::default(),
            steps: vec![
                StepConfig {
                    name: "observe".to_string(),
                    template: "Conversation:\n{{ memory }}\nMetadata: {{ metadata }}\n{{ input }}"
                        .to_string(),
                    tool: Some("echo".to_string()),
                },
                StepConfig {
                    name: "answer".to_string(),
                    template: "Observations: {{ toolResults }}\nAnswer: {{ input }}".to_string(),
                    tool: None,
                },
            ],
        }
    }

    /// Validate configuration values
    ///
    /// Tool references in steps are checked when the workflow is built.
    pub fn validate(&self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.memory.window == 0 {
            return Err(EngineError::Config(
                "memory.window must be at least 1".to_string(),
            ));
        }

        if self.execution.tool_timeout_secs == Some(0) {
            return Err(EngineError::Config(
                "execution.tool_timeout_secs must be greater than 0".to_string(),
            ));
        }

        for name in &self.tools.enabled {
            if !BUILTIN_TOOL_NAMES.contains(&name.as_str()) {
                return Err(EngineError::Config(format!(
                    "Unknown built-in tool '{}'. Must be one of: {}",
                    name,
                    BUILTIN_TOOL_NAMES.join(", ")
                )));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(EngineError::Config(format!(
                    "steps[{}] has an empty name",
                    index
                )));
            }
        }

        Ok(())
    }
}
