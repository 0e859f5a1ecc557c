//! Service configuration.
//!
//! Settings come from a YAML file when one is given, otherwise from
//! environment variables. YAML values may reference the environment with
//! `${VAR}` or `${VAR:-default}`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use record_chunking::ChunkingConfig;
use serde::{Deserialize, Serialize};
use sounding_export::ExportConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KlusterConfig {
    /// Rechunking and Zarr settings.
    pub chunking: ChunkingConfig,

    /// Sounding export settings.
    pub export: ExportConfig,
}

impl KlusterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            chunking: ChunkingConfig::from_env(),
            export: ExportConfig::from_env(),
        }
    }

    /// Load configuration from a YAML file with environment substitution.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;

        let expanded = expand_env_vars(&content)?;

        let config: KlusterConfig = serde_yaml::from_str(&expanded)
            .with_context(|| format!("Failed to parse config YAML from {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise from the environment, and
    /// validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.chunking
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid chunking config: {}", e))?;
        self.export
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid export config: {}", e))?;
        Ok(())
    }
}

/// Replace `${VAR}` and `${VAR:-default}` with values from the environment.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve `VAR` or `VAR:-default`.
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}
