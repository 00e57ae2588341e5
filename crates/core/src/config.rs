//! Project configuration.
//!
//! Values come from `<project>/.shadowscope.json` when present and are then
//! overridden by `SHADOWSCOPE_M2_REPO` and `SHADOWSCOPE_API_LEVEL`.

use crate::error::{Result, ShadowscopeError};
use serde::{Deserialize, Serialize};
use shadowscope_api::{IMPLEMENTATION, IMPLEMENTS};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".shadowscope.json";
pub const ENV_M2_REPO: &str = "SHADOWSCOPE_M2_REPO";
pub const ENV_API_LEVEL: &str = "SHADOWSCOPE_API_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowscopeConfig {
    /// Annotation marking a shadow class.
    pub implements_annotation: String,
    /// Annotation marking a shadow method.
    pub implementation_annotation: String,
    /// Local Maven repository holding the versioned framework archives.
    pub m2_repository: PathBuf,
    /// API level whose archives are active when none is given explicitly.
    pub api_level: Option<u32>,
    /// Extra source roots, relative to the project, scanned for framework
    /// classes when no versioned source archive is active.
    pub framework_source_roots: Vec<PathBuf>,
}

impl Default for ShadowscopeConfig {
    fn default() -> Self {
        Self {
            implements_annotation: IMPLEMENTS.to_string(),
            implementation_annotation: IMPLEMENTATION.to_string(),
            m2_repository: default_m2_repository(),
            api_level: None,
            framework_source_roots: Vec::new(),
        }
    }
}

pub fn default_m2_repository() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".m2")
        .join("repository")
}

impl ShadowscopeConfig {
    /// Loads the configuration for `project_root`, applying environment
    /// overrides.
    pub fn load(project_root: &Path) -> Result<Self> {
        let mut config = Self::from_file(&project_root.join(CONFIG_FILE_NAME))?;
        config.apply_overrides(
            std::env::var(ENV_M2_REPO).ok(),
            std::env::var(ENV_API_LEVEL).ok(),
        )?;
        Ok(config)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = serde_json::from_str(&text)?;
                tracing::debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn apply_overrides(
        &mut self,
        m2_repository: Option<String>,
        api_level: Option<String>,
    ) -> Result<()> {
        if let Some(repo) = m2_repository.filter(|s| !s.is_empty()) {
            self.m2_repository = PathBuf::from(repo);
        }
        if let Some(level) = api_level.filter(|s| !s.is_empty()) {
            let parsed = level.trim().parse::<u32>().map_err(|_| {
                ShadowscopeError::Config(format!("{ENV_API_LEVEL} is not a number: {level}"))
            })?;
            self.api_level = Some(parsed);
        }
        Ok(())
    }
}
