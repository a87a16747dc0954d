//! Tool configuration.
//!
//! Holds the values written into synthesized and updated IntelliSense
//! entries. Configuration is optionally stored in a `.keil2vscode.toml`
//! file next to the Keil project.
//!
//! # Configuration File Format
//!
//! ```toml
//! compiler_path = "C:/gcc-arm-none-eabi-10.3-2021.10/bin/arm-none-eabi-gcc.exe"
//! intelli_sense_mode = "linux-gcc-arm"
//! c_standard = "c99"
//! cpp_standard = "c++11"
//! ```
//!
//! Every key is optional. The compiler path is resolved in this order:
//! `--compiler-path`, `KEIL2VSCODE_COMPILER_PATH`, the config file, the
//! built-in default.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = ".keil2vscode.toml";

/// Environment variable overriding the compiler path.
pub const COMPILER_PATH_ENV: &str = "KEIL2VSCODE_COMPILER_PATH";

/// Compiler used when nothing else is configured.
pub const DEFAULT_COMPILER_PATH: &str = "arm-none-eabi-gcc";

/// Values written into every synthesized or updated configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    /// Toolchain executable, forced into `compilerPath` on every update.
    pub compiler_path: String,
    /// `intelliSenseMode` of new entries.
    pub intelli_sense_mode: String,
    /// `cStandard` of new entries.
    pub c_standard: String,
    /// `cppStandard` of new entries.
    pub cpp_standard: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            compiler_path: DEFAULT_COMPILER_PATH.to_string(),
            intelli_sense_mode: "linux-gcc-arm".to_string(),
            c_standard: "c99".to_string(),
            cpp_standard: "c++11".to_string(),
        }
    }
}

impl ToolConfig {
    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("can not open config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Resolves the effective configuration.
    ///
    /// * `config_path` - Explicit config file. Must exist when given.
    /// * `src_dir` - Directory searched for [`CONFIG_FILE_NAME`] when no
    ///   explicit file is given. A missing default file is not an error.
    /// * `env_compiler` - Value of [`COMPILER_PATH_ENV`], if set.
    /// * `cli_compiler` - `--compiler-path`, if given.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn resolve(
        config_path: Option<&Path>,
        src_dir: &Path,
        env_compiler: Option<String>,
        cli_compiler: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = src_dir.join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        let non_empty = |s: &String| !s.is_empty();
        if let Some(compiler) = cli_compiler.filter(non_empty).or(env_compiler.filter(non_empty)) {
            config.compiler_path = compiler;
        }

        debug!("Compiler path: {}", config.compiler_path);
        Ok(config)
    }
}
