//! Simulation configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`OBJSIM_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use objsim_run::{RendererKind, RendererPipeline, SchedulerConfig};

/// Main simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Scheduler configuration
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Renderer pipeline configuration
    #[serde(default)]
    pub renderers: RenderersConfig,
    /// Demo scenario configuration
    #[serde(default)]
    pub demo: DemoConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl SimConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`OBJSIM_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // OBJSIM_SCHEDULER__TICK_MS=20 -> scheduler.tick_ms = 20
        figment = figment.merge(Env::prefixed("OBJSIM_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine would refuse later
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_ms == 0 {
            return Err(ConfigError::invalid("scheduler.tick_ms must be positive"));
        }
        if self.renderers.pipeline.is_empty() {
            log::warn!("Renderer pipeline is empty; entities will never age or move");
        }
        Ok(())
    }

    /// Scheduler settings
    pub fn scheduler_config(&self) -> SchedulerConfig {
        self.scheduler.clone()
    }

    /// Renderer pipeline built from the configured list
    pub fn pipeline(&self) -> RendererPipeline {
        RendererPipeline::from_kinds(&self.renderers.pipeline)
    }
}

/// Renderer pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderersConfig {
    /// Built-in renderers to run; order in the list does not matter, priority does
    pub pipeline: Vec<RendererKind>,
}

impl Default for RenderersConfig {
    fn default() -> Self {
        Self {
            pipeline: RendererKind::DEFAULTS.to_vec(),
        }
    }
}

/// Demo scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Stop after this much wall time even if the simulation is still going
    pub duration_ms: u64,
    /// Particles launched by the fountain on its first tick
    pub particles: usize,
    /// Seed for launch velocities; random if absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5_000,
            particles: 32,
            seed: None,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.scheduler.tick_ms, 50);
        assert!(!config.scheduler.stop_when_empty);
        assert_eq!(config.renderers.pipeline.len(), 6);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = SimConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("tick_ms"));
        assert!(toml.contains("standalone_physics"));
    }

    #[test]
    fn test_config_round_trip_through_toml() {
        let text = r#"
            [scheduler]
            tick_ms = 20
            stop_when_empty = true

            [renderers]
            pipeline = ["rule", "lifetime"]
        "#;
        let config: SimConfig = toml::from_str(text).unwrap();
        assert_eq!(config.scheduler.tick_ms, 20);
        assert!(config.scheduler.stop_when_empty);
        assert_eq!(config.pipeline().names(), vec!["lifetime", "rule"]);
        assert_eq!(config.demo.particles, 32);
    }

    #[test]
    fn test_unknown_renderer_rejected() {
        let text = r#"
            [renderers]
            pipeline = ["lifetime", "teleport"]
        "#;
        assert!(toml::from_str::<SimConfig>(text).is_err());
    }

    #[test]
    fn test_zero_tick_invalid() {
        let mut config = SimConfig::default();
        config.scheduler.tick_ms = 0;
        assert!(config.validate().is_err());
    }
}
