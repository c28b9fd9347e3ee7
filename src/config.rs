//! Bundle configuration.
//!
//! Values are layered: built-in defaults, then `LUMINID_*` environment
//! variables, then command-line flags. The environment is only read by
//! [`BundleConfig::from_env`], called once from `main`.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{BundleError, Result};

pub const DEFAULT_SCRIPT: &str = "dist/main.roadroller.js";
pub const DEFAULT_TEMPLATE: &str = "index.html";
pub const DEFAULT_OUTPUT: &str = "dist/index.html";
pub const DEFAULT_ASSET: &str = "favicon.ico";
pub const DEFAULT_ASSET_OUTPUT: &str = "dist/favicon.ico";

/// Everything one `pack` run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Directory relative paths are resolved against.
    pub root: PathBuf,
    pub script: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    /// Optional auxiliary asset; skipped when the file does not exist.
    pub asset: Option<PathBuf>,
    pub asset_output: PathBuf,
    /// Turn a missing marker or a blown size budget into an error.
    pub strict: bool,
    /// Byte budget for the written bundle.
    pub max_bytes: Option<u64>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            script: PathBuf::from(DEFAULT_SCRIPT),
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            asset: Some(PathBuf::from(DEFAULT_ASSET)),
            asset_output: PathBuf::from(DEFAULT_ASSET_OUTPUT),
            strict: false,
            max_bytes: None,
        }
    }
}

impl BundleConfig {
    /// Defaults overlaid with `LUMINID_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns. Unset and empty
    /// values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("LUMINID_ROOT") {
            config.root = PathBuf::from(v);
        }
        if let Some(v) = get("LUMINID_SCRIPT") {
            config.script = PathBuf::from(v);
        }
        if let Some(v) = get("LUMINID_TEMPLATE") {
            config.template = PathBuf::from(v);
        }
        if let Some(v) = get("LUMINID_OUT") {
            config.output = PathBuf::from(v);
        }
        if let Some(v) = get("LUMINID_ASSET") {
            config.asset = Some(PathBuf::from(v));
        }
        if let Some(v) = get("LUMINID_ASSET_OUT") {
            config.asset_output = PathBuf::from(v);
        }
        if let Some(v) = get("LUMINID_MAX_BYTES") {
            let budget = v.trim().parse().map_err(|_| BundleError::Config {
                var: "LUMINID_MAX_BYTES".to_string(),
                value: v.clone(),
            })?;
            config.max_bytes = Some(budget);
        }

        Ok(config)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn script_path(&self) -> PathBuf {
        self.resolve(&self.script)
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.template)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output)
    }

    pub fn asset_path(&self) -> Option<PathBuf> {
        self.asset.as_deref().map(|p| self.resolve(p))
    }

    pub fn asset_output_path(&self) -> PathBuf {
        self.resolve(&self.asset_output)
    }

    /// Every input path, for the watcher.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.script_path(), self.template_path()];
        paths.extend(self.asset_path());
        paths
    }
}
