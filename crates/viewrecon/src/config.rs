//! Registry and initialization configuration.

use std::path::PathBuf;

use viewrecon_core::LogLevel;

use crate::backend::{InitIdentity, RuntimeInit};

/// Configuration options for a [`ContextRegistry`](crate::ContextRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Engine version reported with a project ID when none is supplied.
    pub engine_version_fallback: String,
    /// Runtime log directory used when none is supplied.
    pub default_log_path: PathBuf,
    /// Minimum level for the registry's logger.
    pub log_level: LogLevel,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            engine_version_fallback: "1.0".to_owned(),
            default_log_path: PathBuf::from("."),
            log_level: LogLevel::Info,
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn with_engine_version_fallback(mut self, version: impl Into<String>) -> Self {
        self.engine_version_fallback = version.into();
        self
    }

    #[must_use]
    pub fn with_default_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_log_path = path.into();
        self
    }

    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

/// How the application identifies itself when the registry initializes.
///
/// A non-empty project ID takes precedence over the numeric application ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    pub app_id: u64,
    pub project_id: Option<String>,
    pub engine_version: Option<String>,
    pub log_path: Option<PathBuf>,
}

impl InitOptions {
    /// Options identifying the application by numeric ID.
    pub fn with_app_id(app_id: u64) -> Self {
        Self {
            app_id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Resolve these options against the registry defaults.
    pub(crate) fn resolve(&self, config: &RegistryConfig) -> RuntimeInit {
        let identity = match self.project_id.as_deref() {
            Some(project_id) if !project_id.is_empty() => InitIdentity::ProjectId {
                project_id: project_id.to_owned(),
                engine_version: self
                    .engine_version
                    .clone()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| config.engine_version_fallback.clone()),
            },
            _ => InitIdentity::ApplicationId(self.app_id),
        };

        let log_path = self
            .log_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| config.default_log_path.clone());

        RuntimeInit { identity, log_path }
    }
}
