//! `.env` discovery.
//!
//! ghops looks for a `.env` file in a fixed list of locations relative to the
//! working directory (and finally the config directory). The first file found
//! is parsed with `dotenvy`; its values are only consulted for keys the
//! process environment leaves unset, and are never exported.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::dirs;

const FILE_NAME: &str = ".env";

#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

/// A parsed `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    pub path: PathBuf,
    vars: BTreeMap<String, String>,
}

impl EnvFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let parse_error = |source| EnvFileError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let mut vars = BTreeMap::new();
        for item in dotenvy::from_path_iter(path).map_err(parse_error)? {
            let (key, value) = item.map_err(parse_error)?;
            vars.insert(key, value.trim().to_string());
        }

        Ok(Self {
            path: path.to_path_buf(),
            vars,
        })
    }

    /// Load the first existing candidate for `cwd`, if any.
    pub fn discover(cwd: &Path) -> anyhow::Result<Option<Self>> {
        match find_env_file(&candidate_paths(cwd)) {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading .env");
                Self::load(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Locations searched for a `.env` file, in priority order.
pub fn candidate_paths(cwd: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = cwd
        .ancestors()
        .take(3)
        .map(|dir| dir.join(FILE_NAME))
        .collect();
    if let Some(config_dir) = dirs::app_config_dir() {
        candidates.push(config_dir.join(FILE_NAME));
    }
    candidates
}

pub fn find_env_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}
